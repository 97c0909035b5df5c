use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Split {
    pub name: String,
    pub duration: Duration,
}

/// Wall-clock timer with named splits, reported through `tracing`.
#[derive(Debug)]
pub struct Stopwatch {
    pub splits: Vec<Split>,
    pub name: String,
    start_total: Instant,
    start_split: Instant,
}

impl Stopwatch {
    pub fn new(name: &str) -> Stopwatch {
        let now = Instant::now();
        Stopwatch {
            splits: Vec::default(),
            name: name.to_owned(),
            start_total: now,
            start_split: now,
        }
    }

    pub fn total_elapsed(&self) -> Duration {
        self.start_total.elapsed()
    }

    pub fn split_elapsed(&self) -> Duration {
        self.start_split.elapsed()
    }

    pub fn record_split(&mut self, name: &str) -> Duration {
        let duration = self.split_elapsed();
        self.start_split = Instant::now();
        self.splits.push(Split {
            name: name.to_owned(),
            duration,
        });
        duration
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Stopwatch: {};  Total elapsed duration: {:?}",
            self.name,
            self.total_elapsed()
        );
        for split in self.splits.iter() {
            tracing::info!("  {}: {:?}", split.name, split.duration);
        }
    }
}
