//! Open device sessions and the sample translator thread.
//!
//! A [`Session`] owns one configured sampler and the worker thread that
//! turns its sample frames into host input events. The worker is the only
//! writer of the sample buffers; the control path shares just two atomics
//! with it (the stop flag and the active-slot count), so reconfiguring a
//! running session never races buffer memory.

use crate::error::DriverError;
use crate::event::{Axis, Button, Buttons, InputEvent};
use crate::sampler::{ReadStatus, TouchSample, TouchSampler};
use crate::sink::EventSink;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Upper bound on one blocking wait inside the worker; also the worst-case
/// latency of a `close` request landing.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Previous-frame state of one slot, used for edge detection.
#[derive(Clone, Copy, Debug)]
struct SlotState {
    x: i32,
    y: i32,
    pressure: i32,
}

impl Default for SlotState {
    /// -1 marks "no prior position": the first sample after a lift is
    /// absolute motion, not a delta against a stale coordinate.
    fn default() -> Self {
        Self {
            x: -1,
            y: -1,
            pressure: 0,
        }
    }
}

struct Shared {
    stop: AtomicBool,
    max_slots: AtomicUsize,
}

/// A running translating session for one open touch device.
///
/// Dropping a session closes it; [`Session::close`] does the same
/// explicitly. Either way the worker is stopped and joined before any
/// shared state goes away.
pub struct Session {
    shared: Arc<Shared>,
    slot_capacity: usize,
    worker: Option<JoinHandle<()>>,
}

impl Session {
    /// Allocate buffers and start the translator thread.
    pub(crate) fn spawn(
        sampler: Box<dyn TouchSampler>,
        sink: Box<dyn EventSink>,
        slot_capacity: usize,
    ) -> Result<Self, DriverError> {
        let shared = Arc::new(Shared {
            stop: AtomicBool::new(false),
            max_slots: AtomicUsize::new(1),
        });

        let current = vec![TouchSample::default(); slot_capacity];
        let previous = vec![SlotState::default(); slot_capacity];

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("touch-events".into())
            .spawn(move || translator_loop(sampler, sink, worker_shared, current, previous))
            .map_err(|err| DriverError::Init(format!("failed to spawn event thread: {err}")))?;

        Ok(Self {
            shared,
            slot_capacity,
            worker: Some(worker),
        })
    }

    /// Currently configured active-slot count.
    pub fn max_slots(&self) -> usize {
        self.shared.max_slots.load(Ordering::Relaxed)
    }

    /// Set how many slots the translator reads per frame.
    ///
    /// Validates before publishing: a rejected count leaves the previous
    /// value active.
    pub fn set_max_slots(&self, count: usize) -> Result<(), DriverError> {
        if count == 0 || count > self.slot_capacity {
            return Err(DriverError::InvalidArgument(format!(
                "max_slots {count} outside 1..={}",
                self.slot_capacity
            )));
        }
        self.shared.max_slots.store(count, Ordering::Relaxed);
        Ok(())
    }

    /// `false` once the worker has terminated (stream end or read error).
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map(|w| !w.is_finished())
            .unwrap_or(false)
    }

    /// Stop the translator and release the device.
    ///
    /// Blocks until the worker has exited; never fails.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.shared.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("touch event thread panicked during shutdown");
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Worker body: bounded reads, translate, repeat until stopped.
fn translator_loop(
    mut sampler: Box<dyn TouchSampler>,
    mut sink: Box<dyn EventSink>,
    shared: Arc<Shared>,
    mut current: Vec<TouchSample>,
    mut previous: Vec<SlotState>,
) {
    log::debug!("touch event thread started");

    while !shared.stop.load(Ordering::Acquire) {
        let active = shared
            .max_slots
            .load(Ordering::Relaxed)
            .min(current.len());

        match sampler.read_frame(&mut current[..active], READ_TIMEOUT) {
            Ok(ReadStatus::Frame) => {
                translate_frame(&current[..active], &mut previous, sink.as_mut())
            }
            Ok(ReadStatus::TimedOut) => {}
            Err(err) => {
                log::warn!("touch sample stream ended: {err}");
                break;
            }
        }
    }

    log::debug!("touch event thread terminated");
}

/// Convert one sample frame into input events.
///
/// Per slot, emission order is X motion, Y motion, then the press/release
/// edge. Motion is only reported while the contact is down; a lift resets
/// the slot's previous position to the sentinel.
fn translate_frame(samples: &[TouchSample], previous: &mut [SlotState], sink: &mut dyn EventSink) {
    for (slot, sample) in samples.iter().enumerate() {
        if !sample.valid {
            continue;
        }
        let prev = &mut previous[slot];

        if sample.pressure != 0 {
            if sample.x != prev.x {
                sink.dispatch(&InputEvent::AxisMoved {
                    axis: Axis::X,
                    value: sample.x,
                    buttons: Buttons::LEFT,
                    slot,
                });
                prev.x = sample.x;
            }
            if sample.y != prev.y {
                sink.dispatch(&InputEvent::AxisMoved {
                    axis: Axis::Y,
                    value: sample.y,
                    buttons: Buttons::LEFT,
                    slot,
                });
                prev.y = sample.y;
            }
        } else {
            prev.x = -1;
            prev.y = -1;
        }

        if (sample.pressure != 0) != (prev.pressure != 0) {
            let event = if sample.pressure != 0 {
                InputEvent::ButtonPressed {
                    button: Button::Left,
                    slot,
                }
            } else {
                InputEvent::ButtonReleased {
                    button: Button::Left,
                    slot,
                }
            };
            sink.dispatch(&event);
            prev.pressure = sample.pressure;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::SamplerError;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::mpsc;
    use std::time::Instant;

    fn down(x: i32, y: i32) -> TouchSample {
        TouchSample {
            x,
            y,
            pressure: 255,
            valid: true,
        }
    }

    fn up() -> TouchSample {
        TouchSample {
            x: 0,
            y: 0,
            pressure: 0,
            valid: true,
        }
    }

    fn collect_frame(samples: &[TouchSample], previous: &mut [SlotState]) -> Vec<InputEvent> {
        let mut events = Vec::new();
        translate_frame(samples, previous, &mut |ev: &InputEvent| {
            events.push(ev.clone())
        });
        events
    }

    #[test]
    fn untouched_slot_emits_nothing() {
        let mut previous = vec![SlotState::default(); 2];
        let samples = [down(100, 50), TouchSample::default()];
        let events = collect_frame(&samples, &mut previous);
        assert!(events.iter().all(|ev| ev.slot() == 0));
    }

    #[test]
    fn first_press_emits_x_y_then_press() {
        let mut previous = vec![SlotState::default(); 1];
        let events = collect_frame(&[down(100, 50)], &mut previous);
        assert_eq!(
            events,
            vec![
                InputEvent::AxisMoved {
                    axis: Axis::X,
                    value: 100,
                    buttons: Buttons::LEFT,
                    slot: 0
                },
                InputEvent::AxisMoved {
                    axis: Axis::Y,
                    value: 50,
                    buttons: Buttons::LEFT,
                    slot: 0
                },
                InputEvent::ButtonPressed {
                    button: Button::Left,
                    slot: 0
                },
            ]
        );
    }

    #[test]
    fn unchanged_axis_stays_silent() {
        let mut previous = vec![SlotState::default(); 1];
        collect_frame(&[down(100, 50)], &mut previous);

        let events = collect_frame(&[down(100, 60)], &mut previous);
        assert_eq!(
            events,
            vec![InputEvent::AxisMoved {
                axis: Axis::Y,
                value: 60,
                buttons: Buttons::LEFT,
                slot: 0
            }]
        );
    }

    #[test]
    fn release_emits_single_edge_and_resets_sentinel() {
        let mut previous = vec![SlotState::default(); 1];
        collect_frame(&[down(100, 50)], &mut previous);

        let events = collect_frame(&[up()], &mut previous);
        assert_eq!(
            events,
            vec![InputEvent::ButtonReleased {
                button: Button::Left,
                slot: 0
            }]
        );
        assert_eq!((previous[0].x, previous[0].y), (-1, -1));

        // next press at the same coordinates is absolute again
        let events = collect_frame(&[down(100, 50)], &mut previous);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn pressure_variation_while_held_is_not_an_edge() {
        let mut previous = vec![SlotState::default(); 1];
        collect_frame(&[down(100, 50)], &mut previous);

        let varied = TouchSample {
            x: 100,
            y: 50,
            pressure: 40,
            valid: true,
        };
        let events = collect_frame(&[varied], &mut previous);
        assert!(events.is_empty());
    }

    #[test]
    fn second_slot_events_carry_their_slot_id() {
        let mut previous = vec![SlotState::default(); 3];
        let samples = [
            TouchSample::default(),
            TouchSample::default(),
            down(7, 9),
        ];
        let events = collect_frame(&samples, &mut previous);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|ev| ev.slot() == 2));
    }

    /// Replays scripted frames, then fails like a closed stream.
    struct ScriptedSampler {
        frames: VecDeque<Vec<TouchSample>>,
    }

    impl TouchSampler for ScriptedSampler {
        fn configure(&mut self) -> Result<(), SamplerError> {
            Ok(())
        }

        fn read_frame(
            &mut self,
            out: &mut [TouchSample],
            _timeout: Duration,
        ) -> Result<ReadStatus, SamplerError> {
            match self.frames.pop_front() {
                Some(frame) => {
                    for (slot, sample) in out.iter_mut().zip(frame) {
                        *slot = sample;
                    }
                    Ok(ReadStatus::Frame)
                }
                None => Err(SamplerError::Read(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "script exhausted",
                ))),
            }
        }
    }

    /// Never produces a frame; every read waits out its timeout.
    struct IdleSampler;

    impl TouchSampler for IdleSampler {
        fn configure(&mut self) -> Result<(), SamplerError> {
            Ok(())
        }

        fn read_frame(
            &mut self,
            _out: &mut [TouchSample],
            timeout: Duration,
        ) -> Result<ReadStatus, SamplerError> {
            thread::sleep(timeout);
            Ok(ReadStatus::TimedOut)
        }
    }

    #[test]
    fn session_translates_and_terminates_on_stream_end() {
        let (tx, rx) = mpsc::channel();
        let sampler = ScriptedSampler {
            frames: VecDeque::from([vec![down(100, 50)], vec![up()]]),
        };
        let session = Session::spawn(
            Box::new(sampler),
            Box::new(move |ev: &InputEvent| tx.send(ev.clone()).unwrap()),
            10,
        )
        .unwrap();

        let mut events = Vec::new();
        for _ in 0..4 {
            events.push(rx.recv_timeout(Duration::from_secs(2)).unwrap());
        }
        assert_eq!(
            events,
            vec![
                InputEvent::AxisMoved {
                    axis: Axis::X,
                    value: 100,
                    buttons: Buttons::LEFT,
                    slot: 0
                },
                InputEvent::AxisMoved {
                    axis: Axis::Y,
                    value: 50,
                    buttons: Buttons::LEFT,
                    slot: 0
                },
                InputEvent::ButtonPressed {
                    button: Button::Left,
                    slot: 0
                },
                InputEvent::ButtonReleased {
                    button: Button::Left,
                    slot: 0
                },
            ]
        );

        // the script is exhausted; the worker ends on its own
        let deadline = Instant::now() + Duration::from_secs(2);
        while session.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!session.is_running());
        session.close();
    }

    #[test]
    fn close_joins_while_worker_is_waiting() {
        let session = Session::spawn(
            Box::new(IdleSampler),
            Box::new(|_: &InputEvent| {}),
            10,
        )
        .unwrap();

        thread::sleep(Duration::from_millis(20));
        let started = Instant::now();
        session.close();
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn slot_count_is_validated_before_publication() {
        let session = Session::spawn(
            Box::new(IdleSampler),
            Box::new(|_: &InputEvent| {}),
            10,
        )
        .unwrap();

        assert_eq!(session.max_slots(), 1);
        assert!(matches!(
            session.set_max_slots(11),
            Err(DriverError::InvalidArgument(_))
        ));
        assert!(matches!(
            session.set_max_slots(0),
            Err(DriverError::InvalidArgument(_))
        ));
        assert_eq!(session.max_slots(), 1);

        session.set_max_slots(10).unwrap();
        assert_eq!(session.max_slots(), 10);
    }
}
