use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// One output row: the overlap between a figure's caption and its article body.
///
/// `co_occurrence_count` is derived from the word list at construction and
/// cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFigureRecord")]
pub struct FigureRecord {
    #[serde(rename = "pmcid")]
    document_id: String,
    #[serde(rename = "fig_id")]
    figure_id: String,
    #[serde(rename = "co_occurance")]
    co_occurring_words: Vec<String>,
    #[serde(rename = "url_ref")]
    graphic_url: Option<String>,
    #[serde(rename = "co_occurance_count")]
    co_occurrence_count: usize,
}

impl FigureRecord {
    pub fn new(
        document_id: impl Into<String>,
        figure_id: impl Into<String>,
        co_occurring_words: BTreeSet<String>,
        graphic_url: Option<String>,
    ) -> Self {
        let co_occurring_words: Vec<String> = co_occurring_words.into_iter().collect();
        FigureRecord {
            document_id: document_id.into(),
            figure_id: figure_id.into(),
            co_occurrence_count: co_occurring_words.len(),
            co_occurring_words,
            graphic_url,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn figure_id(&self) -> &str {
        &self.figure_id
    }

    /// Words found in both the caption and the body, sorted and distinct.
    pub fn co_occurring_words(&self) -> &[String] {
        &self.co_occurring_words
    }

    pub fn graphic_url(&self) -> Option<&str> {
        self.graphic_url.as_deref()
    }

    pub fn co_occurrence_count(&self) -> usize {
        self.co_occurrence_count
    }

    pub fn key(&self) -> RecordKey<'_> {
        RecordKey {
            document_id: &self.document_id,
            figure_id: &self.figure_id,
        }
    }
}

#[derive(Deserialize)]
struct RawFigureRecord {
    pmcid: String,
    fig_id: String,
    co_occurance: Vec<String>,
    url_ref: Option<String>,
    co_occurance_count: usize,
}

impl TryFrom<RawFigureRecord> for FigureRecord {
    type Error = String;

    fn try_from(raw: RawFigureRecord) -> Result<Self, Self::Error> {
        let words: BTreeSet<String> = raw.co_occurance.into_iter().collect();
        if words.len() != raw.co_occurance_count {
            return Err(format!(
                "co_occurance_count {} does not match {} distinct words",
                raw.co_occurance_count,
                words.len()
            ));
        }
        Ok(FigureRecord::new(raw.pmcid, raw.fig_id, words, raw.url_ref))
    }
}

/// Composite `(document_id, figure_id)` key of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey<'a> {
    pub document_id: &'a str,
    pub figure_id: &'a str,
}

impl fmt::Display for RecordKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.document_id, self.figure_id)
    }
}

/// Figure records of many documents, in input-id order.
///
/// Duplicate keys are kept as separate rows; see [`ResultTable::duplicate_keys`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable {
    records: Vec<FigureRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: FigureRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[FigureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = RecordKey<'_>> {
        self.records.iter().map(FigureRecord::key)
    }

    /// Keys that appear more than once, each reported once, in first-seen order.
    pub fn duplicate_keys(&self) -> Vec<RecordKey<'_>> {
        let mut seen: HashMap<RecordKey<'_>, usize> = HashMap::new();
        let mut dups = Vec::new();
        for key in self.keys() {
            let count = seen.entry(key).or_insert(0);
            *count += 1;
            if *count == 2 {
                dups.push(key);
            }
        }
        dups
    }

    /// Number of distinct documents that contributed at least one row.
    pub fn document_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.document_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

impl Extend<FigureRecord> for ResultTable {
    fn extend<I: IntoIterator<Item = FigureRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl FromIterator<FigureRecord> for ResultTable {
    fn from_iter<I: IntoIterator<Item = FigureRecord>>(iter: I) -> Self {
        ResultTable {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ResultTable {
    type Item = FigureRecord;
    type IntoIter = std::vec::IntoIter<FigureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
