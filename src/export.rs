use crate::chapters::ChapterHeader;
use crate::document::TokenRecord;
use crate::vocabulary::{RankingCriterion, VocabularyExtract};
use serde::Serialize;

pub const TOKEN_COLUMNS: [&str; 16] = [
    "index",
    "text",
    "normalized_text",
    "lemma",
    "source",
    "pos",
    "tag",
    "dep",
    "shape",
    "is_alpha",
    "is_stop",
    "length",
    "corpus_frequency",
    "form_cumulative_count",
    "lemma_cumulative_count",
    "form_total_count",
];

pub const EXTRACT_COLUMNS: [&str; 3] = ["normalized_text", "document_frequency", "corpus_frequency"];

pub const CHAPTER_COLUMNS: [&str; 2] = ["chapter", "title"];

/// Rectangular, already formatted table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Comma-separated rendering with a header line
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        write_csv_line(&mut out, self.columns.iter().copied());
        for row in &self.rows {
            write_csv_line(&mut out, row.iter().map(String::as_str));
        }
        out
    }
}

fn write_csv_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

fn frequency(value: f64) -> String {
    format!("{:.2}", value + 0.0)
}

/// Full token table, one row per record in document order
pub fn tokens_table(records: &[TokenRecord]) -> Table {
    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.index.to_string(),
                r.text.clone(),
                r.normalized_text.clone(),
                r.lemma.clone(),
                r.source.clone(),
                r.pos.clone(),
                r.tag.clone(),
                r.dep.clone(),
                r.shape.clone(),
                r.is_alpha.to_string(),
                r.is_stop.to_string(),
                r.length.to_string(),
                frequency(r.corpus_frequency),
                r.form_cumulative_count.to_string(),
                r.lemma_cumulative_count.to_string(),
                r.form_total_count.to_string(),
            ]
        })
        .collect();

    Table {
        name: "tokens".to_string(),
        columns: TOKEN_COLUMNS.to_vec(),
        rows,
    }
}

pub fn extract_table(extract: &VocabularyExtract) -> Table {
    let novel = extract.criterion == RankingCriterion::RarestFirst;
    let mut columns = EXTRACT_COLUMNS.to_vec();
    if novel {
        columns.push("frequency_per_million");
    }

    let rows = extract
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.normalized_text.clone(),
                row.document_frequency.to_string(),
                frequency(row.corpus_frequency),
            ];
            if novel {
                cells.push(frequency(row.frequency_per_million.unwrap_or_default()));
            }
            cells
        })
        .collect();
    let name = if novel { "novel" } else { "salient" };

    Table {
        name: name.to_string(),
        columns,
        rows,
    }
}

pub fn chapters_table(chapters: &[ChapterHeader]) -> Table {
    Table {
        name: "chapters".to_string(),
        columns: CHAPTER_COLUMNS.to_vec(),
        rows: chapters
            .iter()
            .map(|c| vec![c.chapter.clone(), c.title.clone()])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::ExtractRow;

    #[test]
    fn test_csv_quoting() {
        let table = Table {
            name: "t".to_string(),
            columns: vec!["a", "b"],
            rows: vec![
                vec!["plain".to_string(), "with,comma".to_string()],
                vec!["say \"hi\"".to_string(), "".to_string()],
            ],
        };
        assert_eq!(
            table.to_csv(),
            "a,b\nplain,\"with,comma\"\n\"say \"\"hi\"\"\",\n"
        );
    }

    #[test]
    fn test_novel_table_columns_and_precision() {
        let extract = VocabularyExtract {
            criterion: RankingCriterion::RarestFirst,
            rows: vec![ExtractRow {
                normalized_text: "ran".to_string(),
                document_frequency: 1,
                corpus_frequency: 0.2,
                frequency_per_million: Some(200.0),
            }],
        };
        let table = extract_table(&extract);

        assert_eq!(table.name, "novel");
        assert_eq!(
            table.columns,
            vec!["normalized_text", "document_frequency", "corpus_frequency", "frequency_per_million"]
        );
        assert_eq!(table.rows[0], vec!["ran", "1", "0.20", "200.00"]);
    }

    #[test]
    fn test_negative_zero_prints_unsigned() {
        let extract = VocabularyExtract {
            criterion: RankingCriterion::RarestFirst,
            rows: vec![ExtractRow {
                normalized_text: "zebra".to_string(),
                document_frequency: 1,
                corpus_frequency: -0.0,
                frequency_per_million: Some(-0.0),
            }],
        };
        assert_eq!(extract_table(&extract).rows[0], vec!["zebra", "1", "0.00", "0.00"]);
    }

    #[test]
    fn test_salient_table_has_three_columns() {
        let extract = VocabularyExtract {
            criterion: RankingCriterion::MostFrequentFirst,
            rows: vec![ExtractRow {
                normalized_text: "cat".to_string(),
                document_frequency: 2,
                corpus_frequency: 50.0,
                frequency_per_million: None,
            }],
        };
        let table = extract_table(&extract);

        assert_eq!(table.name, "salient");
        assert_eq!(table.to_csv(), "normalized_text,document_frequency,corpus_frequency\ncat,2,50.00\n");
    }

    #[test]
    fn test_chapters_table_quotes_titles() {
        let chapters = vec![ChapterHeader {
            chapter: "CHAPTER III".to_string(),
            title: "A Caucus-Race, and a Long Tale".to_string(),
        }];
        assert_eq!(
            chapters_table(&chapters).to_csv(),
            "chapter,title\nCHAPTER III,\"A Caucus-Race, and a Long Tale\"\n"
        );
    }

    #[test]
    fn test_empty_tokens_table_keeps_header() {
        let table = tokens_table(&[]);
        assert!(table.is_empty());
        assert_eq!(table.to_csv().lines().count(), 1);
        assert!(table.to_csv().starts_with("index,text,"));
    }
}
