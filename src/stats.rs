use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::Local;
use prettytable::{cell, Row, Table};

use crate::error::Result;
use crate::intersect::Ray;
use crate::Float;

// Helper trait to print out Float type used
trait FloatName {
    fn float_name() -> String;
}

impl FloatName for f64 {
    fn float_name() -> String {
        "f64".to_string()
    }
}

lazy_static::lazy_static! {
    static ref STATS: Mutex<Statistics> = Mutex::new(Statistics::new());
}

macro_rules! stats {
    () => {
        STATS.lock().unwrap()
    };
}

macro_rules! current_render {
    () => {
        stats!().current().unwrap()
    };
}

/// Timestamped file name for `print_and_save`.
pub fn default_path() -> PathBuf {
    PathBuf::from(Local::now().format("render_%F_%H%M%S.txt").to_string())
}

pub fn print_and_save(path: &Path) -> Result<()> {
    let table = stats!().table();
    table.printstd();
    let mut stats_file = File::create(path)?;
    table.print(&mut stats_file)?;
    Ok(())
}

/// Opens a new column in the statistics table. Timers and ray counts
/// recorded afterwards belong to this render.
pub fn new_render(name: &str) {
    stats!().new_render(name);
}

pub fn time(name: &str) -> TimerHandle {
    current_render!().start_timer(name)
}

fn stop_timer(name: &str) {
    current_render!().stop_timer(name);
}

pub fn start_render() {
    let mut handle = time("Render");
    Ray::reset_count();
    handle.deactivate();
}

pub fn stop_render() {
    stop_timer("Render");
    current_render!().ray_count = Ray::count();
}

struct Statistics {
    render_stats: Vec<RenderStatistics>,
}

impl Statistics {
    fn new() -> Statistics {
        Statistics {
            render_stats: Vec::new(),
        }
    }

    fn new_render(&mut self, name: &str) {
        self.render_stats.push(RenderStatistics::new(name));
    }

    fn current(&mut self) -> Option<&mut RenderStatistics> {
        self.render_stats.iter_mut().last()
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        if self.render_stats.is_empty() {
            return table;
        }
        let mut names = vec![cell!(Float::float_name())];
        let mut timer_rows = Vec::new();
        let mut mrps = vec![cell!("Mrays/s")];
        let mut n_rays = vec![cell!("Rays")];
        for (timer, l) in &self.render_stats[0].timers {
            let mut row = Row::empty();
            row.add_cell(cell!(format!("{}{}", "| ".repeat(*l), timer.name)));
            timer_rows.push((&timer.name, row))
        }
        for stats in &self.render_stats {
            names.push(cell!(stats.render));
            mrps.push(cell!(stats.mrps()));
            n_rays.push(cell!(stats.ray_count));
            for (name, row) in &mut timer_rows {
                if let Some(timer) = stats.get_timer(name) {
                    row.add_cell(cell!(timer.pretty_duration()));
                } else {
                    row.add_cell(cell!("-"));
                }
            }
        }
        table.add_row(Row::new(names));
        table.add_row(Row::new(mrps));
        for (_, row) in timer_rows {
            table.add_row(row);
        }
        table.add_row(Row::new(n_rays));
        table
    }
}

struct RenderStatistics {
    render: String,
    timers: Vec<(Timer, usize)>,
    active_timers: Vec<usize>,
    ray_count: usize,
}

impl RenderStatistics {
    fn new(name: &str) -> RenderStatistics {
        RenderStatistics {
            render: name.to_string(),
            timers: Vec::new(),
            active_timers: Vec::new(),
            ray_count: 0,
        }
    }

    fn start_timer(&mut self, name: &str) -> TimerHandle {
        let timer = Timer::new(name);
        let handle = timer.handle();
        self.timers.push((timer, self.active_timers.len()));
        self.active_timers.push(self.timers.len() - 1);
        handle
    }

    // Stops the most recent running timer with this name. Renders may
    // overlap when driven from separate threads, so a strict stack
    // discipline cannot be assumed here.
    fn stop_timer(&mut self, name: &str) {
        let position = self
            .active_timers
            .iter()
            .rposition(|&i| self.timers[i].0.name == name);
        if let Some(pos) = position {
            let i = self.active_timers.remove(pos);
            self.timers[i].0.stop();
        } else {
            log::warn!("tried to stop timer '{}' that is not running", name);
        }
    }

    fn get_timer(&self, name: &str) -> Option<&Timer> {
        for (timer, _) in &self.timers {
            if timer.name == name {
                return Some(timer);
            }
        }
        None
    }

    fn mrps(&self) -> String {
        let duration = self
            .get_timer("Render")
            .and_then(|timer| timer.duration);
        match duration {
            Some(duration) => {
                let mrps = self.ray_count as f64 / duration.as_secs_f64() / 1_000_000.0;
                format!("{:#.2?}", mrps)
            }
            None => "-".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Timer {
    name: String,
    start: Instant,
    duration: Option<Duration>,
}

impl Timer {
    fn new(name: &str) -> Timer {
        Timer {
            name: name.to_string(),
            start: Instant::now(),
            duration: None,
        }
    }

    fn stop(&mut self) {
        assert!(
            self.duration.is_none(),
            "Tried to stop already stopped timer!"
        );
        self.duration = Some(self.start.elapsed());
    }

    fn pretty_duration(&self) -> String {
        if let Some(duration) = &self.duration {
            format!("{:#.2?}", duration)
        } else {
            format!("{:#.2?}", self.start.elapsed())
        }
    }

    fn handle(&self) -> TimerHandle {
        TimerHandle {
            name: self.name.clone(),
            active: true,
        }
    }
}

pub struct TimerHandle {
    name: String,
    active: bool,
}

impl TimerHandle {
    pub fn stop(&mut self) {
        stop_timer(&self.name);
        self.deactivate();
    }

    // Prevent handle from stopping the timer when dropped
    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if self.active {
            self.stop()
        }
    }
}
