//! One-shot hardware peripheral initialization.
//!
//! Configures the LEDC timer and channel behind the pump PWM output using
//! raw ESP-IDF sys calls.  Called once from `main()` before the control
//! loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    LedcTimerFailed(i32),
    LedcChannelFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LedcTimerFailed(rc) => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelFailed(rc) => write!(f, "LEDC channel config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

pub const LEDC_CH_PUMP: u32 = 0;

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_pump_pwm() -> Result<(), HwInitError> {
    // Timer 0: pump motor (25 kHz, 8-bit)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::PUMP_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: called once from the single main task before the loop starts.
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcTimerFailed(ret)); }

    // Channel 0: pump PWM, starts fully off
    let channel = ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_PUMP,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::PUMP_PWM_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    // SAFETY: same single-task init context as above.
    let ret = unsafe { ledc_channel_config(&channel) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcChannelFailed(ret)); }

    info!(
        "hw_init: LEDC pump PWM on GPIO{} ({} Hz, {}-bit)",
        pins::PUMP_PWM_GPIO,
        pins::PUMP_PWM_FREQ_HZ,
        pins::PWM_RESOLUTION_BITS
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_pump_pwm() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): LEDC init skipped");
    Ok(())
}

/// Write a raw duty to an LEDC channel.  Returns the ESP-IDF error code
/// on failure.
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) -> Result<(), i32> {
    // SAFETY: LEDC channels were configured in init_pump_pwm(); duty
    // register writes are race-free since only the main loop calls this.
    let ret = unsafe { ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty) };
    if ret != ESP_OK as i32 { return Err(ret); }
    let ret = unsafe { ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel) };
    if ret != ESP_OK as i32 { return Err(ret); }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u32) -> Result<(), i32> {
    Ok(())
}
