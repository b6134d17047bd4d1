//! Accelerometer gesture detection
//!
//! Three kinds of gesture come out of the sample stream:
//!
//! - impulses (3g, 6g, 8g), reported as soon as the force crosses each
//!   threshold and re-armed once it falls back under 3g
//! - shake, after several strong sign reversals on any axis
//! - postures (tilt, face up/down, freefall), reported once the same
//!   posture has been seen for `GESTURE_DAMPING` consecutive samples

use heapless::Vec;

use bitlink_protocol::Gesture;

use crate::traits::AccelSample;

/// Tilt threshold on the X and Y axes (mg)
pub const TILT_TOLERANCE: i16 = 200;
/// Face up/down threshold on the Z axis (mg)
pub const FACE_TOLERANCE: i16 = 400;
/// Freefall when the total force is below this (mg)
pub const FREEFALL_TOLERANCE: u32 = 400;
/// Axis value that counts as a strong swing for shake detection (mg)
pub const SHAKE_TOLERANCE: i16 = 400;
/// Reversals needed to report a shake
pub const SHAKE_COUNT: u8 = 4;
/// Quiet samples after which one pending reversal is forgotten
pub const SHAKE_DAMPING: u8 = 10;
/// Consecutive samples needed before a posture is reported
pub const GESTURE_DAMPING: u8 = 5;

const fn square(mg: u32) -> u32 {
    mg * mg
}

// Ascending force thresholds (squared mg) and the gesture each one raises
const IMPULSES: [(u32, Gesture); 3] = [
    (square(3000), Gesture::ThreeG),
    (square(6000), Gesture::SixG),
    (square(8000), Gesture::EightG),
];

/// Tracks strong sign reversals per axis
#[derive(Debug, Default)]
struct ShakeDetector {
    last_sign: [i8; 3],
    count: u8,
    quiet: u8,
}

impl ShakeDetector {
    /// Returns true when enough reversals have accumulated
    fn update(&mut self, sample: &AccelSample) -> bool {
        let mut reversed = false;
        for (value, last) in sample.axes().into_iter().zip(self.last_sign.iter_mut()) {
            let sign = if value > SHAKE_TOLERANCE {
                1
            } else if value < -SHAKE_TOLERANCE {
                -1
            } else {
                continue;
            };
            if *last != 0 && *last != sign {
                reversed = true;
            }
            *last = sign;
        }

        if reversed {
            self.count += 1;
            self.quiet = 0;
            if self.count >= SHAKE_COUNT {
                self.count = 0;
                return true;
            }
        } else if self.count > 0 {
            self.quiet += 1;
            if self.quiet >= SHAKE_DAMPING {
                self.quiet = 0;
                self.count -= 1;
            }
        }
        false
    }
}

/// Turns raw accelerometer samples into gesture events
#[derive(Debug, Default)]
pub struct GestureTracker {
    settled: Option<Gesture>,
    candidate: Option<Gesture>,
    sigma: u8,
    impulses_fired: usize,
    shake: ShakeDetector,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last posture that was reported
    pub fn current(&self) -> Option<Gesture> {
        self.settled
    }

    /// Feed one sample; returns the gestures it raised
    pub fn update(&mut self, sample: AccelSample) -> Vec<Gesture, 4> {
        let mut raised = Vec::new();
        self.update_impulses(&sample, &mut raised);

        if self.shake.update(&sample) {
            self.settled = Some(Gesture::Shake);
            self.candidate = Some(Gesture::Shake);
            self.sigma = GESTURE_DAMPING;
            let _ = raised.push(Gesture::Shake);
            return raised;
        }

        let posture = classify_posture(&sample);
        if posture == self.candidate {
            self.sigma = (self.sigma + 1).min(GESTURE_DAMPING);
        } else {
            self.candidate = posture;
            self.sigma = 1;
        }

        if self.sigma >= GESTURE_DAMPING && self.candidate != self.settled {
            self.settled = self.candidate;
            if let Some(gesture) = self.settled {
                let _ = raised.push(gesture);
            }
        }
        raised
    }

    fn update_impulses(&mut self, sample: &AccelSample, raised: &mut Vec<Gesture, 4>) {
        let force = sample.magnitude_squared();
        let level = IMPULSES
            .iter()
            .take_while(|(threshold, _)| force > *threshold)
            .count();
        if level == 0 {
            self.impulses_fired = 0;
            return;
        }
        for (_, gesture) in &IMPULSES[self.impulses_fired.min(level)..level] {
            let _ = raised.push(*gesture);
        }
        self.impulses_fired = self.impulses_fired.max(level);
    }
}

/// Posture suggested by a single sample
pub fn classify_posture(sample: &AccelSample) -> Option<Gesture> {
    if sample.magnitude_squared() < square(FREEFALL_TOLERANCE) {
        return Some(Gesture::Freefall);
    }
    if sample.x < -TILT_TOLERANCE {
        return Some(Gesture::TiltLeft);
    }
    if sample.x > TILT_TOLERANCE {
        return Some(Gesture::TiltRight);
    }
    if sample.y < -TILT_TOLERANCE {
        return Some(Gesture::TiltDown);
    }
    if sample.y > TILT_TOLERANCE {
        return Some(Gesture::TiltUp);
    }
    if sample.z < -FACE_TOLERANCE {
        return Some(Gesture::FaceUp);
    }
    if sample.z > FACE_TOLERANCE {
        return Some(Gesture::FaceDown);
    }
    None
}
