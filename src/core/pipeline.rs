//! Concurrent streaming filter
//!
//! One producer reads raw lines into a bounded queue, a fixed pool of
//! workers decodes each line and checks it against the [`CoordinateSet`],
//! and one consumer writes the surviving lines to the output sink.
//!
//! A run goes through these stages:
//!
//! 1. the line terminator is detected from the first line, which is
//!    written out as the header (extended to the full block for VCF input);
//! 2. producer, workers and consumer stream the remaining lines;
//! 3. the driver waits for one completion signal per worker, closes the
//!    output queue, then joins the consumer;
//! 4. the reader thread is joined last, and only on success.
//!
//! A malformed line or a failed write raises a shared abort: the reader
//! stops at its next line, idle workers are released at once, and `run`
//! returns the error without waiting on a reader blocked on a quiet pipe.
//!
//! With more than one worker, matching lines can reach the sink in a
//! different order than they were read. Use one worker, or
//! [`PipelineConfig::preserve_order`], when input order matters.

use crate::core::coords::CoordinateSet;
use crate::core::error::{DetectError, FilterError, Result};
use crate::core::record::{chrom_key, FieldLayout, Record};
use crate::core::terminator::{detect_terminator, LineTerminator};
use crate::formats::vcf::{is_vcf_header, read_header_block};
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Default number of worker threads
pub const DEFAULT_WORKERS: usize = 10;

/// Default capacity of each bounded queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Pipeline settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of worker threads; fixed, not derived from input or cores
    pub workers: usize,
    /// Capacity of the input and output queues
    pub queue_capacity: usize,
    /// Prefix data-file chromosomes with `chr` before lookup
    pub normalize_chrom: bool,
    /// Emit matches in input order regardless of worker count
    pub preserve_order: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            normalize_chrom: false,
            preserve_order: false,
        }
    }
}

impl PipelineConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_normalize_chrom(mut self, normalize: bool) -> Self {
        self.normalize_chrom = normalize;
        self
    }

    pub fn with_preserve_order(mut self, preserve: bool) -> Self {
        self.preserve_order = preserve;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(FilterError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(FilterError::Config(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Filter run statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterStats {
    /// Terminator detected on the data stream
    pub terminator: LineTerminator,
    /// Lines passed through as header
    pub header_lines: usize,
    /// Data lines read (blank lines excluded)
    pub records: usize,
    /// Data lines written to the sink
    pub matched: usize,
}

/// Raw line on its way to the workers
struct Candidate {
    seq: u64,
    line_no: usize,
    line: Vec<u8>,
}

/// Worker decision; misses are only sent in ordered mode
struct Verdict {
    seq: u64,
    line: Option<Vec<u8>>,
}

/// Sends a worker's completion signal when dropped, including on error or
/// panic, so the driver never waits on a worker that already exited.
struct CompletionSignal {
    worker: usize,
    done: Sender<usize>,
}

impl Drop for CompletionSignal {
    fn drop(&mut self) {
        let _ = self.done.send(self.worker);
    }
}

/// Fatal-error latch shared by the reader, workers and writer.
///
/// Raising it sets the flag polled between lines and wakes the driver,
/// which then releases workers idling on an empty line queue.
#[derive(Clone)]
struct Abort {
    flag: Arc<AtomicBool>,
    raised: Sender<()>,
}

impl Abort {
    fn new() -> (Self, Receiver<()>) {
        let (raised, faults) = unbounded();
        let abort = Self {
            flag: Arc::new(AtomicBool::new(false)),
            raised,
        };
        (abort, faults)
    }

    fn raise(&self) {
        self.flag.store(true, Ordering::Relaxed);
        let _ = self.raised.send(());
    }

    fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Streaming position filter over a finished coordinate set
pub struct FilterPipeline<'a> {
    coords: &'a CoordinateSet,
    config: PipelineConfig,
}

impl<'a> FilterPipeline<'a> {
    pub fn new(coords: &'a CoordinateSet, config: PipelineConfig) -> Self {
        Self { coords, config }
    }

    /// Filter `reader` into `writer`.
    ///
    /// The header is written first, verbatim. Every data line whose
    /// (chromosome, position) is in the coordinate set follows, with the
    /// detected terminator. The writer is flushed but not closed. Any
    /// malformed data line aborts the run with an error, without waiting
    /// for `reader` to produce more input.
    pub fn run<R, W>(&self, mut reader: R, mut writer: W) -> Result<FilterStats>
    where
        R: BufRead + Send + 'static,
        W: Write + Send,
    {
        self.config.validate()?;
        let mut stats = FilterStats::default();

        let terminator = match detect_terminator(&mut reader) {
            Ok(detected) => {
                let mut header = detected.consumed;
                header.extend_from_slice(detected.terminator.as_bytes());
                stats.header_lines = 1;
                if is_vcf_header(&header) {
                    stats.header_lines +=
                        read_header_block(&mut reader, detected.terminator, &mut header)?;
                }
                writer.write_all(&header)?;
                detected.terminator
            }
            Err(DetectError::UnexpectedEof { consumed }) => {
                // At most one unterminated line: it is the whole header
                log::debug!("No line terminator in data stream");
                stats.header_lines = usize::from(!consumed.is_empty());
                writer.write_all(&consumed)?;
                writer.flush()?;
                return Ok(stats);
            }
            Err(DetectError::Io(e)) => return Err(e.into()),
        };

        stats.terminator = terminator;
        log::debug!(
            "Detected {:?} terminator, {} header line(s)",
            terminator,
            stats.header_lines
        );

        let (records, matched) =
            self.stream(reader, &mut writer, terminator, stats.header_lines)?;
        stats.records = records;
        stats.matched = matched;
        Ok(stats)
    }

    fn stream<R, W>(
        &self,
        reader: R,
        writer: &mut W,
        terminator: LineTerminator,
        header_lines: usize,
    ) -> Result<(usize, usize)>
    where
        R: BufRead + Send + 'static,
        W: Write + Send,
    {
        let workers = self.config.workers;
        let ordered = self.config.preserve_order;
        let (line_tx, line_rx) = bounded::<Candidate>(self.config.queue_capacity);
        let (verdict_tx, verdict_rx) = bounded::<Verdict>(self.config.queue_capacity);
        let (done_tx, done_rx) = bounded::<usize>(workers);
        // Never sent on: dropping the sender releases idle workers
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let (abort, faults) = Abort::new();

        // Outside the scope: a reader stalled on a quiet pipe must not hold
        // back a fatal error raised downstream
        let producer = {
            let abort = abort.clone();
            thread::spawn(move || produce(reader, terminator, header_lines, line_tx, &abort))
        };

        let matched = thread::scope(|s| {
            let abort = &abort;

            let pool: Vec<_> = (0..workers)
                .map(|worker| {
                    let lines = line_rx.clone();
                    let stop = stop_rx.clone();
                    let verdicts = verdict_tx.clone();
                    let signal = CompletionSignal {
                        worker,
                        done: done_tx.clone(),
                    };
                    s.spawn(move || {
                        let _signal = signal;
                        self.work(lines, stop, verdicts, abort)
                    })
                })
                .collect();
            drop(line_rx);
            drop(stop_rx);
            drop(done_tx);

            let consumer =
                s.spawn(move || consume(verdict_rx, writer, terminator, ordered, abort));

            // Drain: all workers done -> close output queue -> join consumer
            let mut stop_tx = Some(stop_tx);
            let mut remaining = workers;
            while remaining > 0 {
                select! {
                    recv(done_rx) -> done => match done {
                        Ok(_) => remaining -= 1,
                        Err(_) => break,
                    },
                    recv(faults) -> _ => {
                        if stop_tx.take().is_some() {
                            log::debug!("Fatal error raised, releasing idle workers");
                        }
                    }
                }
            }
            drop(verdict_tx);
            let consumed = consumer.join();

            let mut first_error = None;
            for handle in pool {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        first_error.get_or_insert(e);
                    }
                    Err(_) => {
                        first_error.get_or_insert(FilterError::WorkerPanicked("worker"));
                    }
                }
            }
            if let Some(e) = first_error {
                return Err(e);
            }

            match consumed {
                Ok(result) => result,
                Err(_) => Err(FilterError::WorkerPanicked("consumer")),
            }
        })?;

        // Only joined when workers and writer finished cleanly, which means
        // the reader already hit end of input or failed itself
        let records = match producer.join() {
            Ok(result) => result?,
            Err(_) => return Err(FilterError::WorkerPanicked("producer")),
        };
        Ok((records, matched))
    }

    fn work(
        &self,
        lines: Receiver<Candidate>,
        stop: Receiver<()>,
        verdicts: Sender<Verdict>,
        abort: &Abort,
    ) -> Result<()> {
        let normalize = self.config.normalize_chrom;
        let ordered = self.config.preserve_order;
        let mut key_buf = Vec::with_capacity(32);

        loop {
            let candidate = select! {
                recv(lines) -> candidate => match candidate {
                    Ok(candidate) => candidate,
                    Err(_) => break,
                },
                recv(stop) -> _ => break,
            };
            if abort.is_raised() {
                break;
            }

            let record = match Record::parse(&candidate.line, FieldLayout::DATA) {
                Ok(record) => record,
                Err(e) => {
                    abort.raise();
                    log::warn!("Aborting filter at line {}: {}", candidate.line_no, e);
                    return Err(FilterError::at_line(candidate.line_no, e));
                }
            };
            let key = chrom_key(record.chrom, normalize, &mut key_buf);
            let hit = self.coords.contains(key, record.pos);

            let line = if hit {
                Some(candidate.line)
            } else if ordered {
                None
            } else {
                continue;
            };

            // Consumer gone: it has already reported its error
            if verdicts
                .send(Verdict {
                    seq: candidate.seq,
                    line,
                })
                .is_err()
            {
                break;
            }
        }
        Ok(())
    }
}

fn produce<R: BufRead>(
    mut reader: R,
    terminator: LineTerminator,
    header_lines: usize,
    lines: Sender<Candidate>,
    abort: &Abort,
) -> Result<usize> {
    let delimiter = terminator.delimiter();
    let mut line_no = header_lines;
    let mut seq = 0u64;

    while !abort.is_raised() {
        let mut line = Vec::with_capacity(256);
        let n = reader.read_until(delimiter, &mut line).map_err(|e| {
            abort.raise();
            FilterError::Io(e)
        })?;
        if n == 0 {
            break;
        }
        line_no += 1;

        terminator.strip(&mut line);
        if line.is_empty() {
            continue;
        }

        // All workers gone
        if lines.send(Candidate { seq, line_no, line }).is_err() {
            break;
        }
        seq += 1;
    }

    Ok(seq as usize)
}

fn consume<W: Write>(
    verdicts: Receiver<Verdict>,
    writer: &mut W,
    terminator: LineTerminator,
    ordered: bool,
    abort: &Abort,
) -> Result<usize> {
    let result = if ordered {
        write_in_order(&verdicts, writer, terminator)
    } else {
        write_as_finished(&verdicts, writer, terminator)
    };
    let result = result.and_then(|matched| writer.flush().map(|()| matched));

    if result.is_err() {
        abort.raise();
    }
    result.map_err(FilterError::Io)
}

fn write_as_finished<W: Write>(
    verdicts: &Receiver<Verdict>,
    writer: &mut W,
    terminator: LineTerminator,
) -> io::Result<usize> {
    let mut matched = 0;
    for verdict in verdicts.iter() {
        if let Some(line) = verdict.line {
            write_line(writer, &line, terminator)?;
            matched += 1;
        }
    }
    Ok(matched)
}

/// Reorder buffer keyed by sequence number
fn write_in_order<W: Write>(
    verdicts: &Receiver<Verdict>,
    writer: &mut W,
    terminator: LineTerminator,
) -> io::Result<usize> {
    let mut pending: BTreeMap<u64, Option<Vec<u8>>> = BTreeMap::new();
    let mut next = 0u64;
    let mut matched = 0;

    for verdict in verdicts.iter() {
        pending.insert(verdict.seq, verdict.line);
        while let Some(line) = pending.remove(&next) {
            next += 1;
            if let Some(line) = line {
                write_line(writer, &line, terminator)?;
                matched += 1;
            }
        }
    }
    Ok(matched)
}

#[inline]
fn write_line<W: Write>(writer: &mut W, line: &[u8], terminator: LineTerminator) -> io::Result<()> {
    writer.write_all(line)?;
    writer.write_all(terminator.as_bytes())
}
