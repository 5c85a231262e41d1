use metrics::gauge;

use super::{Binding, INSTANCE_LABEL};

#[derive(Debug)]
struct Entry {
    binding: &'static Binding,
    count: i64,
}

/// Counts observed during one scrape, in binding order.
#[derive(Debug)]
pub struct Snapshot {
    instance: String,
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample<'a> {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: [(&'static str, &'a str); 1],
    pub value: f64,
}

impl Snapshot {
    pub(super) fn new(instance: &str, capacity: usize) -> Self {
        Snapshot {
            instance: instance.to_owned(),
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(super) fn push(&mut self, binding: &'static Binding, count: i64) {
        self.entries.push(Entry { binding, count });
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count for `resource`, `None` if no such binding was scraped.
    pub fn get(&self, resource: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.binding.resource == resource)
            .map(|e| e.count)
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample<'_>> {
        self.entries.iter().map(|e| Sample {
            name: e.binding.descriptor.name,
            help: e.binding.descriptor.help,
            labels: [(INSTANCE_LABEL, self.instance.as_str())],
            value: e.count as f64,
        })
    }

    /// Sets one gauge per sample on the installed recorder.
    pub fn record(&self) {
        for sample in self.samples() {
            gauge!(sample.name, sample.value, INSTANCE_LABEL => self.instance().to_owned());
        }
    }
}
