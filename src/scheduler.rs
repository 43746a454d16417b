use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use log::{debug, error, info, warn};
use std::{sync::PoisonError, time::Duration};
use tokio_util::sync::CancellationToken;

use crate::{
    cleaner::SharedCleaner,
    errors::{Error, Result},
};

// Upper bound of a single wait, the wall clock is re-read at least this often
const MAX_WAIT: Duration = Duration::from_secs(60);

/// A local wall-clock time of day at which the pass fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyAt {
    hour: u32,
    minute: u32,
}

impl DailyAt {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidSchedule(format!(
                "{hour:02}:{minute:02} is not a valid time of day"
            )));
        }

        Ok(DailyAt { hour, minute })
    }

    fn on(&self, date: NaiveDate) -> NaiveDateTime {
        // Range checked in `new`
        date.and_time(NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or_default())
    }

    /// First fire time strictly after `now`.
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = self.on(now.date());
        if today > now {
            today
        } else {
            self.on(now.date() + TimeDelta::days(1))
        }
    }

    /// Today's fire time while its minute has not fully elapsed, tomorrow's otherwise.
    pub fn upcoming(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = self.on(now.date());
        if now < today + TimeDelta::minutes(1) {
            today
        } else {
            self.on(now.date() + TimeDelta::days(1))
        }
    }
}

impl std::str::FromStr for DailyAt {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || Error::InvalidSchedule(format!("expected HH:MM, got '{s}'"));
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        let minute = minute.parse::<u32>().map_err(|_| invalid())?;

        DailyAt::new(hour, minute)
    }
}

impl std::fmt::Display for DailyAt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Source of the local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Where a triggered pass runs. Both modes wait for the pass before the next wake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    // On the scheduler task itself
    #[default]
    Inline,
    // On tokio's blocking thread pool
    Blocking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
enum State {
    Running,
    Triggered,
    Stopped,
}

pub struct Scheduler<C = LocalClock> {
    cleaner: SharedCleaner,
    at: DailyAt,
    execution: Execution,
    clock: C,
}

impl Scheduler<LocalClock> {
    pub fn new(cleaner: SharedCleaner, at: DailyAt) -> Self {
        Scheduler {
            cleaner,
            at,
            execution: Execution::default(),
            clock: LocalClock,
        }
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn with_clock<T: Clock>(self, clock: T) -> Scheduler<T> {
        Scheduler {
            cleaner: self.cleaner,
            at: self.at,
            execution: self.execution,
            clock,
        }
    }

    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    fn transition(&self, state: State) {
        debug!("Cleaner scheduler is {state}");
    }

    /// Fires the cleanup pass once per calendar day at the configured time until
    /// `cancel` fires. Returns the number of passes run.
    ///
    /// A pass in progress is not interrupted, cancellation is observed right after it.
    pub async fn run(&self, cancel: CancellationToken) -> usize {
        let mut fired = 0;
        let mut last_fired: Option<NaiveDate> = None;
        let mut last_seen = self.clock.now();
        let mut next = self.at.upcoming(last_seen);
        info!("Cleaner scheduled daily at {}, next run at {next}", self.at);
        self.transition(State::Running);

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let now = self.clock.now();
            if now < last_seen {
                next = self.at.upcoming(now);
                warn!("Wall clock went back to {now}, next run at {next}");
            }
            last_seen = now;

            if now >= next {
                if last_fired == Some(next.date()) {
                    debug!("Already ran on {}, skipping", next.date());
                } else {
                    self.transition(State::Triggered);
                    self.trigger().await;
                    fired += 1;
                    last_fired = Some(next.date());
                    self.transition(State::Running);
                }
                next = self.at.next_after(self.clock.now().max(next));
                debug!("Next cleanup at {next}");
                continue;
            }

            let wait = (next - now).to_std().unwrap_or_default().min(MAX_WAIT);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
        }

        self.transition(State::Stopped);
        info!("Cleaner scheduler is done");

        fired
    }

    async fn trigger(&self) {
        match self.execution {
            Execution::Inline => run_pass(&self.cleaner),
            Execution::Blocking => {
                let cleaner = self.cleaner.clone();
                if let Err(e) = tokio::task::spawn_blocking(move || run_pass(&cleaner)).await {
                    error!("Cleanup task failed: {e}");
                }
            }
        }
    }
}

fn run_pass(cleaner: &SharedCleaner) {
    // Entries are rebuilt on every pass, a poisoned lock holds nothing stale
    let mut cleaner = cleaner.lock().unwrap_or_else(PoisonError::into_inner);
    let _span = tracing::info_span!("cleanup_pass", root_dir = %cleaner.root_dir().display())
        .entered();
    cleaner.sweep();
}
