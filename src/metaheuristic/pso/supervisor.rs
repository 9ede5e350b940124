use crate::metaheuristic::pso;
use crate::metaheuristic::supervisor::{Message, MessageInfo};

use csv::Writer;
use serde::Serialize;
use std::io::{sink, Sink, Write};
use std::sync::mpsc;
use std::sync::mpsc::{Receiver, Sender};

#[derive(Debug, Serialize)]
struct Record {
    cycle: usize,
    evaluations: usize,
    improvements: usize,
    restarts: usize,
    cpu_time_us: u64,
    best_cost: f64,
    best_reward: u32,
}

/// Collects the messages of a run and writes one csv row per `aggregation_rate` cycles.
/// The best cost and reward of a row are the ones last reported by particle 0.
pub struct Supervisor<W: Write> {
    sender: Sender<pso::Message>,
    receiver: Receiver<pso::Message>,
    aggregation_rate: usize,
    bucket: Option<usize>,
    info: MessageInfo,
    best: (f64, u32),
    writer: Writer<W>,
}

impl<W: Write> Supervisor<W> {
    pub fn new(aggregation_rate: usize, writer: Writer<W>) -> Self {
        let (tx, rx) = mpsc::channel();
        Supervisor {
            sender: tx,
            receiver: rx,
            aggregation_rate: aggregation_rate.max(1),
            bucket: None,
            info: MessageInfo::default(),
            best: (f64::NAN, 0),
            writer,
        }
    }

    pub fn sender(&self) -> Sender<pso::Message> {
        self.sender.clone()
    }

    pub fn aggregate_receive(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            let bucket = message.cycle / self.aggregation_rate;
            if self.bucket.map_or(false, |current| current != bucket) {
                self.write_row();
            }

            self.bucket = Some(bucket);
            self.info += message.get_info();
            if message.is_supervisor() {
                self.best = (message.cost, message.reward);
            }
        }
    }

    /// Writes whatever is still pending and flushes the writer.
    pub fn finish(&mut self) {
        self.aggregate_receive();
        if self.bucket.is_some() {
            self.write_row();
            self.bucket = None;
        }

        if let Err(err) = self.writer.flush() {
            eprintln!("Could not flush statistics: {}", err);
        }
    }

    pub fn into_inner(mut self) -> Option<W> {
        self.finish();
        self.writer.into_inner().ok()
    }

    fn write_row(&mut self) {
        let bucket = match self.bucket {
            Some(bucket) => bucket,
            None => return,
        };

        let record = Record {
            cycle: bucket * self.aggregation_rate,
            evaluations: self.info.evaluations,
            improvements: self.info.n_improvements,
            restarts: self.info.restarts,
            cpu_time_us: self.info.cpu_time.as_micros() as u64,
            best_cost: self.best.0,
            best_reward: self.best.1,
        };
        if let Err(err) = self.writer.serialize(record) {
            eprintln!("Could not write statistics row: {}", err);
        }
        self.info = MessageInfo::default();
    }
}

impl Default for Supervisor<Sink> {
    fn default() -> Self {
        Supervisor::new(1, Writer::from_writer(sink()))
    }
}
