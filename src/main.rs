/*
 *  main.rs
 *
 *  BitClock - just a bit more
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use env_logger::Env;
use log::{debug, info, warn};
use tokio::time::Instant;

#[cfg(unix)] // Only compile this block on Unix-like systems
use tokio::signal::unix::{signal, SignalKind}; // Import specific Unix signals

use bitclock::clock::{ClockSource, FixedClock, LocalClock};
use bitclock::config;
use bitclock::display::{DisplayDriver, DisplayManager, FramebufferDriver};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Waits for SIGINT, SIGTERM or SIGHUP and returns once any arrives.
#[cfg(unix)]
async fn signal_handler() -> anyhow::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn signal_handler() -> anyhow::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received. Initiating graceful shutdown.");
    Ok(())
}

/// Time left until the wall clock reaches its next whole second
fn until_next_second(subsec_nanos: u32) -> Duration {
    // chrono reports a leap second as nanos >= 1e9
    let nanos = subsec_nanos.min(999_999_999);
    Duration::from_nanos(u64::from(1_000_000_000 - nanos))
}

/// Instant of the next wall clock second boundary
fn next_second_boundary() -> Instant {
    Instant::now() + until_next_second(Local::now().timestamp_subsec_nanos())
}

/// One render pass per second until a shutdown signal.
///
/// The boundary is taken from the wall clock before every tick, so the
/// loop follows clock slews. A pass that overruns lands on the following
/// boundary; a failed frame is logged and the next tick tries again.
async fn tick_loop<C: ClockSource>(
    manager: &mut DisplayManager<FramebufferDriver, C>,
) -> anyhow::Result<()> {
    let shutdown = signal_handler();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(next_second_boundary()) => {
                match manager.render_frame() {
                    Ok(snapshot) => debug!("tick {:?}", snapshot),
                    Err(e) => warn!("Failed to render frame: {}", e),
                }
            }
            res = &mut shutdown => {
                res?;
                break;
            }
        }
    }

    info!(
        "Stopped after {} frames",
        manager.driver().frames_flushed()
    );
    Ok(())
}

async fn run<C: ClockSource>(
    cfg: &config::Config,
    clock: C,
    once: bool,
) -> anyhow::Result<()> {
    let geometry = cfg.geometry();
    let mut driver = FramebufferDriver::new(geometry.screen_width, geometry.screen_height, cfg.frame_sink());
    driver.set_invert(cfg.invert())?;

    let mut manager = DisplayManager::new(driver, clock, geometry)
        .context("display initialization failed")?;

    // first frame straight away rather than waiting for the boundary
    manager.render_frame().context("first frame failed")?;
    if once {
        return Ok(());
    }
    tick_loop(&mut manager).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let (cfg, run_opts) = config::load().context("configuration")?;

    if run_opts.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        return Ok(());
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("{} - just a bit more", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    match run_opts.fixed_time {
        Some(fields) => {
            info!("Clock frozen at {:?}", fields);
            run(&cfg, FixedClock::new(fields, cfg.hour_format()), run_opts.once).await
        }
        None => run(&cfg, LocalClock::new(cfg.hour_format()), run_opts.once).await,
    }
}
