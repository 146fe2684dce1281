//! Linear volume fades applied while resampling.

use crate::constants::RAMP_ONE;
use crate::math::mul_scale_volume;

/// A linear fade from `volume` towards `target`, applied to one output channel.
///
/// A resample call reads the ramp, fades across the samples it produces and writes the volume it
/// reached back into [`volume`](VolumeRamp::volume), so consecutive calls continue the same
/// fade.
///
/// # Example
///
/// ```
/// use tracker_resample::VolumeRamp;
///
/// // fade out over whatever length the next call produces
/// let ramp = VolumeRamp::fade(1.0, 0.0);
/// assert_eq!(ramp.volume, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeRamp {
    /// Volume of the next produced sample. 1.0 is unity gain.
    pub volume: f32,

    /// Volume the fade stops at.
    pub target: f32,

    /// Change in volume per produced sample.
    ///
    /// `None` spreads the fade over the samples requested by the next call. The sign is taken
    /// from the direction of the fade, only the magnitude is used.
    pub delta: Option<f32>,

    /// Constant gain applied on top of the fade.
    pub mix: f32,
}

impl VolumeRamp {
    /// A constant volume.
    pub fn new(volume: f32) -> VolumeRamp {
        VolumeRamp {
            volume,
            target: volume,
            delta: None,
            mix: 1.0,
        }
    }

    /// Unity gain.
    pub fn unity() -> VolumeRamp {
        VolumeRamp::new(1.0)
    }

    /// Zero volume.
    pub fn silent() -> VolumeRamp {
        VolumeRamp::new(0.0)
    }

    /// A fade from `from` to `to` spread over the next call.
    pub fn fade(from: f32, to: f32) -> VolumeRamp {
        VolumeRamp {
            target: to,
            ..VolumeRamp::new(from)
        }
    }

    /// Sets a fixed per-sample change in volume.
    pub fn with_delta(mut self, delta: f32) -> VolumeRamp {
        self.delta = Some(delta);
        self
    }

    /// Sets the constant gain applied on top of the fade.
    pub fn with_mix(mut self, mix: f32) -> VolumeRamp {
        self.mix = mix;
        self
    }

    /// Returns `true` if the ramp has reached its target.
    pub fn is_settled(&self) -> bool {
        self.volume == self.target
    }
}

impl Default for VolumeRamp {
    fn default() -> VolumeRamp {
        VolumeRamp::unity()
    }
}

#[inline]
fn to_fixed(value: f32) -> i32 {
    (value * RAMP_ONE) as i32
}

/// A [`VolumeRamp`] converted to fixed point for the duration of one call.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RampState {
    volr: i32,
    vold: i32,
    volt: i32,
    volm: i32,
    // samples until a fade spread over the request lands on its target
    left: Option<usize>,
}

impl RampState {
    /// Loads `ramp` for a call that may produce up to `frames` samples.
    pub(crate) fn begin(ramp: &VolumeRamp, frames: usize) -> RampState {
        let volr = to_fixed(ramp.volume);
        let volt = to_fixed(ramp.target);
        let distance = volt as i64 - volr as i64;

        let mut left = None;
        let vold = if distance == 0 {
            0
        } else {
            let step = match ramp.delta {
                Some(delta) => to_fixed(delta.abs()) as i64,
                None => {
                    let frames = frames.max(1);
                    left = Some(frames);
                    (distance / frames as i64).abs().max(1)
                }
            };
            (step * distance.signum()) as i32
        };

        RampState {
            volr,
            vold,
            volt,
            volm: to_fixed(ramp.mix),
            left,
        }
    }

    /// Loads `ramp` without any fade, for peeking at the current volume.
    pub(crate) fn hold(ramp: &VolumeRamp) -> RampState {
        RampState {
            volr: to_fixed(ramp.volume),
            vold: 0,
            volt: to_fixed(ramp.volume),
            volm: to_fixed(ramp.mix),
            left: None,
        }
    }

    /// Effective volume of the next sample, 1.0 == `1 << 16`.
    #[inline(always)]
    pub(crate) fn volume(&self) -> i32 {
        mul_scale_volume(self.volr, self.volm)
    }

    /// Returns `true` if every sample this ramp touches comes out silent.
    #[inline]
    pub(crate) fn is_silent(&self) -> bool {
        self.volm == 0 || (self.volr == 0 && self.vold == 0)
    }

    /// Moves one sample along the fade, stopping on the target.
    ///
    /// A fade spread over a request lands exactly on its target after the last requested sample,
    /// whatever the rounding of its step.
    #[inline(always)]
    pub(crate) fn advance(&mut self) {
        if self.vold == 0 {
            return;
        }
        self.volr = self.volr.saturating_add(self.vold);
        if let Some(left) = self.left.as_mut() {
            *left -= 1;
        }
        let reached = self.left == Some(0)
            || if self.vold > 0 {
                self.volr >= self.volt
            } else {
                self.volr <= self.volt
            };
        if reached {
            self.volr = self.volt;
            self.vold = 0;
        }
    }

    /// Writes the volume reached back into `ramp`.
    pub(crate) fn finish(&self, ramp: &mut VolumeRamp) {
        if self.volr == self.volt {
            ramp.volume = ramp.target;
        } else {
            ramp.volume = self.volr as f32 / RAMP_ONE;
        }
    }
}
