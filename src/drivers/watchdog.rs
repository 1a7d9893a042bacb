//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the control loop stalls: a stalled loop means the
//! pump keeps running at its last duty with no ramp or volume cutoff.
//! The loop must call `feed()` on every iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Configure the TWDT with `timeout_ms` and subscribe the current task.
    #[cfg(target_os = "espidf")]
    pub fn new(timeout_ms: u32) -> Self {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: called once from the main task during startup.
        let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
        if ret != ESP_OK as i32 {
            log::warn!("TWDT reconfigure returned {} (may already be configured)", ret);
        }

        // SAFETY: a null handle subscribes the calling task.
        let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
        let subscribed = ret == ESP_OK as i32;
        if subscribed {
            info!("Watchdog: subscribed ({} ms timeout, panic on trigger)", timeout_ms);
        } else {
            log::warn!("Watchdog: failed to subscribe ({})", ret);
        }

        Self { timeout_ms, subscribed }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(timeout_ms: u32) -> Self {
        info!("Watchdog(sim): no-op ({} ms)", timeout_ms);
        Self { timeout_ms }
    }

    /// Feed the watchdog. Must be called at least every `timeout_ms`.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: the calling task subscribed in `new`.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}
