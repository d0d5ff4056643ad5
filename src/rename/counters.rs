use std::fmt;

/// Terminal state of one processed file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    DryRun,
    Moved,
    Copied,
    /// A file is already at the target path and was kept.
    Exists,
    /// The source already sits at its target path.
    Renamed,
    /// The configured skip field is empty.
    NoField,
    BrokenFile,
    /// Renaming is disabled; only metadata actions ran.
    NoRename,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::DryRun => "Dry run",
            Outcome::Moved => "Move",
            Outcome::Copied => "Copy",
            Outcome::Exists => "Exists",
            Outcome::Renamed => "Renamed",
            Outcome::NoField => "No field",
            Outcome::BrokenFile => "Broken file",
            Outcome::NoRename => "No rename",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One count per terminal outcome; owned by the job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    pub dry_run: u64,
    pub moved: u64,
    pub copied: u64,
    pub exists: u64,
    pub renamed: u64,
    pub no_field: u64,
    pub broken_file: u64,
    pub no_rename: u64,
}

impl Counters {
    pub fn record(&mut self, outcome: Outcome) {
        let slot = match outcome {
            Outcome::DryRun => &mut self.dry_run,
            Outcome::Moved => &mut self.moved,
            Outcome::Copied => &mut self.copied,
            Outcome::Exists => &mut self.exists,
            Outcome::Renamed => &mut self.renamed,
            Outcome::NoField => &mut self.no_field,
            Outcome::BrokenFile => &mut self.broken_file,
            Outcome::NoRename => &mut self.no_rename,
        };
        *slot += 1;
    }

    pub fn get(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::DryRun => self.dry_run,
            Outcome::Moved => self.moved,
            Outcome::Copied => self.copied,
            Outcome::Exists => self.exists,
            Outcome::Renamed => self.renamed,
            Outcome::NoField => self.no_field,
            Outcome::BrokenFile => self.broken_file,
            Outcome::NoRename => self.no_rename,
        }
    }

    pub fn total(&self) -> u64 {
        ALL.iter().map(|o| self.get(*o)).sum()
    }
}

const ALL: [Outcome; 8] = [
    Outcome::DryRun,
    Outcome::Moved,
    Outcome::Copied,
    Outcome::Exists,
    Outcome::Renamed,
    Outcome::NoField,
    Outcome::BrokenFile,
    Outcome::NoRename,
];

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in ALL {
            let n = self.get(outcome);
            if n > 0 {
                writeln!(f, "{:<12} {n}", format!("{outcome}:"))?;
            }
        }
        write!(f, "{:<12} {}", "Total:", self.total())
    }
}

/// Numbering for track listings, owned by the job.
#[derive(Debug, Clone, Default)]
pub struct TrackListing {
    last: usize,
}

impl TrackListing {
    pub fn next_number(&mut self) -> usize {
        self.last += 1;
        self.last
    }
}
