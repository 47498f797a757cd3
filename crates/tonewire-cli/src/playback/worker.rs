//! Single-stream playback worker.
//!
//! One thread owns the output device and plays one waveform at a time. A
//! waveform submitted while another is playing replaces it, so at most one
//! output stream is ever open per worker. Jobs travel over a bounded channel;
//! a full queue is reported as [`PlaybackError::Busy`] instead of blocking the
//! caller.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::time::{Duration, Instant};

use tonewire_synth::Waveform;

use super::{PlaybackError, PlaybackHandle, PlaybackResult};

/// Pending jobs the worker accepts before `submit` reports busy.
const QUEUE_DEPTH: usize = 4;

/// Extra time a stream stays open after its last sample so the device
/// buffer drains before the stream is dropped.
const DRAIN_MARGIN: Duration = Duration::from_millis(50);

/// Something that can open an output stream for a block of samples.
///
/// The returned stream plays while it is alive and stops when dropped.
pub(crate) trait OutputDevice {
    type Stream;

    fn start(&mut self, samples: Vec<f32>, sample_rate: u32) -> PlaybackResult<Self::Stream>;
}

struct Job {
    samples: Vec<f32>,
    sample_rate: u32,
    done: SyncSender<PlaybackResult<()>>,
}

impl Job {
    fn length(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    fn finish(self, result: PlaybackResult<()>) {
        // The handle may already be gone.
        let _ = self.done.send(result);
    }
}

/// Handle to a running worker thread.
#[derive(Debug)]
pub(crate) struct PlaybackWorker {
    jobs: SyncSender<Job>,
}

impl PlaybackWorker {
    /// Spawns the worker and opens its device on the worker thread.
    ///
    /// Returns once the device is open, or with the error that prevented it.
    pub(crate) fn spawn<D, F>(name: &str, open: F) -> PlaybackResult<Self>
    where
        D: OutputDevice,
        F: FnOnce() -> PlaybackResult<D> + Send + 'static,
    {
        let (jobs_tx, jobs_rx) = mpsc::sync_channel::<Job>(QUEUE_DEPTH);
        let (ready_tx, ready_rx) = mpsc::sync_channel::<PlaybackResult<()>>(1);

        std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || match open() {
                Ok(device) => {
                    let _ = ready_tx.send(Ok(()));
                    run(device, jobs_rx);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })?;

        ready_rx.recv().map_err(|_| PlaybackError::WorkerStopped)??;
        Ok(Self { jobs: jobs_tx })
    }

    /// Queues `waveform`, replacing whatever is playing.
    pub(crate) fn submit(&self, waveform: &Waveform) -> PlaybackResult<PlaybackHandle> {
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        let job = Job {
            samples: waveform.samples().iter().map(|&s| s as f32).collect(),
            sample_rate: waveform.sample_rate(),
            done: done_tx,
        };

        match self.jobs.try_send(job) {
            Ok(()) => Ok(PlaybackHandle::pending(done_rx)),
            Err(TrySendError::Full(_)) => Err(PlaybackError::Busy),
            Err(TrySendError::Disconnected(_)) => Err(PlaybackError::WorkerStopped),
        }
    }
}

fn run<D: OutputDevice>(mut device: D, jobs: Receiver<Job>) {
    let mut next = jobs.recv().ok();
    while let Some(job) = next.take() {
        next = play(&mut device, job, &jobs);
    }
    log::debug!("Playback worker stopped");
}

/// Plays `job` until it ends or a newer job arrives. Returns the job to play
/// next, if any.
fn play<D: OutputDevice>(device: &mut D, mut job: Job, jobs: &Receiver<Job>) -> Option<Job> {
    let deadline = Instant::now() + job.length() + DRAIN_MARGIN;

    let stream = if job.samples.is_empty() {
        None
    } else {
        match device.start(std::mem::take(&mut job.samples), job.sample_rate) {
            Ok(stream) => Some(stream),
            Err(e) => {
                job.finish(Err(e));
                return jobs.recv().ok();
            }
        }
    };

    let remaining = deadline.saturating_duration_since(Instant::now());
    match jobs.recv_timeout(remaining) {
        Ok(newer) => {
            drop(stream);
            job.finish(Ok(()));
            Some(latest(newer, jobs))
        }
        Err(RecvTimeoutError::Timeout) => {
            drop(stream);
            job.finish(Ok(()));
            jobs.recv().ok()
        }
        Err(RecvTimeoutError::Disconnected) => {
            // The sink is gone; let the current waveform play out.
            std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
            drop(stream);
            job.finish(Ok(()));
            None
        }
    }
}

/// Skips every queued job except the most recent one.
fn latest(mut job: Job, jobs: &Receiver<Job>) -> Job {
    while let Ok(newer) = jobs.try_recv() {
        job.finish(Ok(()));
        job = newer;
    }
    job
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tonewire_synth::generate_sine;

    /// Tracks how many streams are open at once.
    #[derive(Default)]
    struct StreamCounter {
        open: AtomicUsize,
        max_open: AtomicUsize,
        started: AtomicUsize,
    }

    struct FakeDevice {
        counter: Arc<StreamCounter>,
        fail: bool,
    }

    struct FakeStream {
        counter: Arc<StreamCounter>,
    }

    impl Drop for FakeStream {
        fn drop(&mut self) {
            self.counter.open.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl OutputDevice for FakeDevice {
        type Stream = FakeStream;

        fn start(&mut self, _samples: Vec<f32>, sample_rate: u32) -> PlaybackResult<FakeStream> {
            if self.fail {
                return Err(PlaybackError::Unsupported(format!(
                    "{} Hz not supported",
                    sample_rate
                )));
            }
            let open = self.counter.open.fetch_add(1, Ordering::SeqCst) + 1;
            self.counter.max_open.fetch_max(open, Ordering::SeqCst);
            self.counter.started.fetch_add(1, Ordering::SeqCst);
            Ok(FakeStream {
                counter: Arc::clone(&self.counter),
            })
        }
    }

    fn spawn_fake(counter: &Arc<StreamCounter>, fail: bool) -> PlaybackWorker {
        let counter = Arc::clone(counter);
        PlaybackWorker::spawn("test-playback", move || Ok(FakeDevice { counter, fail })).unwrap()
    }

    #[test]
    fn test_plays_to_completion() {
        let counter = Arc::new(StreamCounter::default());
        let worker = spawn_fake(&counter, false);

        let handle = worker.submit(&generate_sine(440.0, 0.02, 8000)).unwrap();
        handle.wait().unwrap();

        assert_eq!(counter.started.load(Ordering::SeqCst), 1);
        assert_eq!(counter.open.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_newer_waveform_replaces_current() {
        let counter = Arc::new(StreamCounter::default());
        let worker = spawn_fake(&counter, false);

        // Long waveforms; each one cuts the previous short.
        let long = generate_sine(440.0, 30.0, 1000);
        let mut handles = Vec::new();
        for _ in 0..3 {
            handles.push(worker.submit(&long).unwrap());
        }
        let last = worker.submit(&generate_sine(440.0, 0.01, 1000)).unwrap();

        let start = Instant::now();
        for handle in handles {
            handle.wait().unwrap();
        }
        last.wait().unwrap();
        assert!(start.elapsed() < Duration::from_secs(10));

        assert_eq!(counter.max_open.load(Ordering::SeqCst), 1);
        assert_eq!(counter.open.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_device_error_reaches_handle() {
        let counter = Arc::new(StreamCounter::default());
        let worker = spawn_fake(&counter, true);

        let err = worker
            .submit(&generate_sine(440.0, 0.02, 44100))
            .unwrap()
            .wait()
            .unwrap_err();
        assert!(matches!(err, PlaybackError::Unsupported(_)));

        // The worker keeps serving after a failure.
        let again = worker.submit(&generate_sine(440.0, 0.02, 44100)).unwrap();
        assert!(again.wait().is_err());
    }

    #[test]
    fn test_open_failure_is_reported_by_spawn() {
        let err = PlaybackWorker::spawn::<FakeDevice, _>("test-playback", || {
            Err(PlaybackError::NoDevice)
        })
        .unwrap_err();
        assert!(matches!(err, PlaybackError::NoDevice));
    }

    #[test]
    fn test_empty_waveform_opens_no_stream() {
        let counter = Arc::new(StreamCounter::default());
        let worker = spawn_fake(&counter, false);

        worker
            .submit(&generate_sine(440.0, 0.0, 44100))
            .unwrap()
            .wait()
            .unwrap();
        assert_eq!(counter.started.load(Ordering::SeqCst), 0);
    }
}
