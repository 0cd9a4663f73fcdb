//! Integration Tests für Status-LED und Dimmer
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockLedWriter
//! bzw. MockDimmerOutput

use home_core::dimmer::Dimmer;
use home_core::status::{
    DeviceMode, FAST_BLINK_MS, SLOW_BLINK_MS, StatusBlinker, StatusPattern,
};
use home_core::{DimmerOutput, LedError, SmartLedWriter, brightness_to_duty};
use rgb::RGB8;

// ============================================================================
// Mock LED Writer
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_color: Option<RGB8>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_color = Some(color);
        self.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Dimmer Output
// ============================================================================

pub struct MockDimmerOutput {
    pub duties: [u32; 3],
    pub writes: Vec<(usize, u32)>,
    pub fail_next_write: bool,
}

impl MockDimmerOutput {
    pub fn new() -> Self {
        Self {
            duties: [0; 3],
            writes: Vec::new(),
            fail_next_write: false,
        }
    }
}

impl DimmerOutput for MockDimmerOutput {
    fn max_duty(&self) -> u32 {
        8191
    }

    fn set_duty(&mut self, channel: usize, duty: u32) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }
        let slot = self.duties.get_mut(channel).ok_or(LedError::InvalidChannel)?;
        *slot = duty;
        self.writes.push((channel, duty));
        Ok(())
    }
}

const BLUE: RGB8 = RGB8 { r: 0, g: 0, b: 10 };
const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

// ============================================================================
// Tests: MockLedWriter
// ============================================================================

#[test]
fn test_mock_led_writer_write() {
    let mut mock = MockLedWriter::new();

    assert_eq!(mock.write_count, 0);
    assert_eq!(mock.last_color, None);

    mock.write(BLUE).unwrap();

    assert_eq!(mock.write_count, 1);
    assert_eq!(mock.last_color, Some(BLUE));
}

#[test]
fn test_mock_led_writer_recovers_after_fail() {
    let mut mock = MockLedWriter::new();
    mock.fail_next_write = true;

    // First write fails
    assert_eq!(mock.write(BLUE), Err(LedError::WriteFailed));

    // Second write succeeds
    assert!(mock.write(BLUE).is_ok());
    assert_eq!(mock.write_count, 1);
}

// ============================================================================
// Tests: Status-LED
// ============================================================================

/// Schreibt `count` Frames auf den Mock und liefert Farben und Haltezeiten
fn run_frames(
    blinker: &mut StatusBlinker,
    led: &mut MockLedWriter,
    count: usize,
) -> Vec<(RGB8, Option<u32>)> {
    (0..count)
        .map(|_| {
            let frame = blinker.next_frame();
            led.write(frame.color).unwrap();
            (frame.color, frame.hold_ms)
        })
        .collect()
}

#[test]
fn test_status_connecting_blinks_fast() {
    let mut blinker = StatusBlinker::new(BLUE);
    let mut led = MockLedWriter::new();

    let mode = StatusPattern::for_mode(DeviceMode::Connecting, false);
    assert!(blinker.apply(mode));

    let frames = run_frames(&mut blinker, &mut led, 4);
    assert_eq!(
        frames,
        vec![
            (BLUE, Some(FAST_BLINK_MS)),
            (BLACK, Some(FAST_BLINK_MS)),
            (BLUE, Some(FAST_BLINK_MS)),
            (BLACK, Some(FAST_BLINK_MS)),
        ]
    );
    assert_eq!(led.write_count, 4);
}

#[test]
fn test_status_unconfigured_blinks_slow() {
    let mut blinker = StatusBlinker::new(BLUE);
    let mut led = MockLedWriter::new();

    blinker.apply(StatusPattern::for_mode(DeviceMode::Unconfigured, false));
    let frames = run_frames(&mut blinker, &mut led, 2);

    assert_eq!(frames[0], (BLUE, Some(SLOW_BLINK_MS)));
    assert_eq!(frames[1], (BLACK, Some(SLOW_BLINK_MS)));
}

#[test]
fn test_status_normal_is_dark_and_waits() {
    let mut blinker = StatusBlinker::new(BLUE);
    let mut led = MockLedWriter::new();

    blinker.apply(StatusPattern::FastBlink);
    run_frames(&mut blinker, &mut led, 1);

    assert!(blinker.apply(StatusPattern::for_mode(DeviceMode::Normal, false)));
    let frames = run_frames(&mut blinker, &mut led, 1);

    assert_eq!(frames[0], (BLACK, None));
    assert_eq!(led.last_color, Some(BLACK));
}

#[test]
fn test_status_motion_lights_solid() {
    let mut blinker = StatusBlinker::new(BLUE);
    let mut led = MockLedWriter::new();

    blinker.apply(StatusPattern::for_mode(DeviceMode::Normal, true));
    let frames = run_frames(&mut blinker, &mut led, 2);

    assert_eq!(frames, vec![(BLUE, None), (BLUE, None)]);
}

#[test]
fn test_status_same_pattern_keeps_phase() {
    let mut blinker = StatusBlinker::new(BLUE);
    let mut led = MockLedWriter::new();

    blinker.apply(StatusPattern::FastBlink);
    run_frames(&mut blinker, &mut led, 1);

    // Erneutes Setzen desselben Musters startet das Blinken nicht neu
    assert!(!blinker.apply(StatusPattern::FastBlink));
    let frames = run_frames(&mut blinker, &mut led, 1);
    assert_eq!(frames[0].0, BLACK);
}

// ============================================================================
// Tests: Dimmer
// ============================================================================

#[test]
fn test_brightness_to_duty() {
    assert_eq!(brightness_to_duty(0, 8191), 0);
    assert_eq!(brightness_to_duty(50, 8191), 4095);
    assert_eq!(brightness_to_duty(100, 8191), 8191);
    assert_eq!(brightness_to_duty(250, 8191), 8191);
}

#[test]
fn test_dimmer_fades_in_ticks() {
    let mut dimmer: Dimmer<MockDimmerOutput, 3> = Dimmer::new(MockDimmerOutput::new(), 20);
    dimmer.fade_to(0, 100, 100).unwrap();

    // 100 ms bei 20 ms Takt → 5 Schritte
    let mut active = Vec::new();
    for _ in 0..5 {
        active.push(dimmer.step().unwrap());
    }

    assert_eq!(active, vec![true, true, true, true, false]);
    assert_eq!(dimmer.output().duties[0], 8191);

    let written: Vec<u32> = dimmer.output().writes.iter().map(|&(_, duty)| duty).collect();
    assert_eq!(written.len(), 5);
    assert!(written.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_dimmer_zero_duration_jumps() {
    let mut dimmer: Dimmer<MockDimmerOutput, 3> = Dimmer::new(MockDimmerOutput::new(), 20);
    dimmer.fade_to(1, 50, 0).unwrap();

    assert!(!dimmer.step().unwrap());
    assert_eq!(dimmer.output().duties[1], 4095);
    assert_eq!(dimmer.duty(1), Some(4095));
}

#[test]
fn test_dimmer_fade_down_and_untouched_channels() {
    let mut dimmer: Dimmer<MockDimmerOutput, 3> = Dimmer::new(MockDimmerOutput::new(), 20);
    dimmer.fade_to(2, 100, 0).unwrap();
    dimmer.step().unwrap();

    dimmer.fade_to(2, 0, 40).unwrap();
    while dimmer.step().unwrap() {}

    assert_eq!(dimmer.output().duties, [0, 0, 0]);
    // Kanäle ohne Auftrag werden nie beschrieben
    assert!(dimmer.output().writes.iter().all(|&(channel, _)| channel == 2));
}

#[test]
fn test_dimmer_invalid_channel() {
    let mut dimmer: Dimmer<MockDimmerOutput, 3> = Dimmer::new(MockDimmerOutput::new(), 20);
    assert_eq!(dimmer.fade_to(3, 50, 0), Err(LedError::InvalidChannel));
}

#[test]
fn test_dimmer_propagates_write_error() {
    let mut output = MockDimmerOutput::new();
    output.fail_next_write = true;
    let mut dimmer: Dimmer<MockDimmerOutput, 3> = Dimmer::new(output, 20);

    dimmer.fade_to(0, 100, 0).unwrap();
    assert_eq!(dimmer.step(), Err(LedError::WriteFailed));
}
