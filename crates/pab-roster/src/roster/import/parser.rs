use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;

/// One spreadsheet row reduced to the columns the roster understands.
///
/// Deserializes from the dashboard's header names (`NIM`, `Nama`, `Fakultas`,
/// `WhatsApp`) as well as the snake_case field names. Cells may arrive as
/// numbers when the sheet was parsed client-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    #[serde(
        default,
        alias = "NIM",
        alias = "nim",
        deserialize_with = "cell_as_text"
    )]
    pub id: String,
    #[serde(
        default,
        alias = "Nama",
        alias = "nama",
        deserialize_with = "cell_as_text"
    )]
    pub name: String,
    #[serde(
        default,
        alias = "Fakultas",
        alias = "fakultas",
        deserialize_with = "cell_as_text"
    )]
    pub faculty: String,
    #[serde(
        default,
        alias = "WhatsApp",
        alias = "whatsapp",
        deserialize_with = "cell_as_text"
    )]
    pub contact_number: String,
}

impl ImportRow {
    pub fn new(id: &str, name: &str, faculty: &str, contact_number: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            faculty: faculty.to_string(),
            contact_number: contact_number.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

fn cell_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let cell = Option::<Cell>::deserialize(deserializer)?;
    Ok(match cell {
        None => String::new(),
        Some(Cell::Text(value)) => value,
        Some(Cell::Integer(value)) => value.to_string(),
        Some(Cell::Float(value)) if value.fract() == 0.0 => format!("{value:.0}"),
        Some(Cell::Float(value)) => value.to_string(),
        Some(Cell::Flag(value)) => value.to_string(),
    })
}

/// CSV cells stay text so identifiers keep their leading zeros.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, rename = "NIM", alias = "nim", alias = "id")]
    id: String,
    #[serde(default, rename = "Nama", alias = "nama", alias = "name")]
    name: String,
    #[serde(default, rename = "Fakultas", alias = "fakultas", alias = "faculty")]
    faculty: String,
    #[serde(
        default,
        rename = "WhatsApp",
        alias = "whatsapp",
        alias = "contact_number"
    )]
    contact_number: String,
}

/// Reads the rows of a roster export in sheet order.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ImportRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<CsvRow>() {
        let row = record?;
        rows.push(ImportRow {
            id: row.id,
            name: row.name,
            faculty: row.faculty,
            contact_number: row.contact_number,
        });
    }

    Ok(rows)
}
