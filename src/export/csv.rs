//! Semicolon-separated CSV export of inventory rows, readable by Excel.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::api::models::{Computer, NamedRef};
use crate::error::ExportError;
use crate::utils::error_helpers::convert_csv_error;

const BOM: &str = "\u{feff}";

pub const EXPORT_HEADERS: [&str; 32] = [
    "№",
    "Цехы",
    "Отдел",
    "Пользователь",
    "Тип орг.техники",
    "IP адрес",
    "MAC адрес",
    "Номер пломбы",
    "Зав. склада",
    "Материнская плата",
    "Модель МП",
    "Процессор",
    "Поколение",
    "Частота",
    "HDD",
    "SSD",
    "Тип диска",
    "Тип RAM",
    "Размер RAM",
    "Видеокарта",
    "Операционная система",
    "Интернет",
    "Активен",
    "Дата добавления",
    "Дата изменения",
    "Пользователь изменения",
    "Принтеры",
    "Сканеры",
    "МФУ",
    "Веб-камеры",
    "Модели веб-камер",
    "Типы мониторов",
];

/// Quote a cell when it contains `,`, `;`, `"` or a newline, doubling inner quotes
pub fn escape_cell(cell: &str) -> Cow<'_, str> {
    if cell.contains([',', ';', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}

fn name_of(reference: &Option<NamedRef>) -> String {
    reference
        .as_ref()
        .map(|r| r.name.clone())
        .unwrap_or_default()
}

fn join_names(references: &[NamedRef]) -> String {
    references
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "Да" } else { "Нет" };
    label.to_string()
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// `DD.MM.YYYY`; unparseable input is kept as is
pub fn format_join_date(raw: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d.%m.%Y").to_string();
    }
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%d.%m.%Y").to_string(),
        None => raw.to_string(),
    }
}

/// `DD.MM.YYYY, HH:MM:SS` in the timestamp's own offset
pub fn format_history_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%d.%m.%Y, %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

/// Cells of one exported row; `number` is the 1-based row number
pub fn record_cells(number: usize, computer: &Computer) -> Vec<String> {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    vec![
        number.to_string(),
        computer.department_name().unwrap_or_default().to_string(),
        computer.section_name().unwrap_or_default().to_string(),
        text(&computer.user),
        computer.hardware_type_name().unwrap_or_default().to_string(),
        text(&computer.ip_address),
        text(&computer.mac_address),
        text(&computer.seal_number),
        name_of(&computer.warehouse_manager),
        name_of(&computer.motherboard),
        name_of(&computer.motherboard_model),
        name_of(&computer.cpu),
        name_of(&computer.generation),
        name_of(&computer.frequency),
        name_of(&computer.hdd),
        name_of(&computer.ssd),
        name_of(&computer.disk_type),
        name_of(&computer.ram_type),
        name_of(&computer.ram_size),
        name_of(&computer.gpu),
        text(&computer.os),
        yes_no(computer.internet),
        yes_no(computer.is_active),
        computer
            .join_date
            .as_deref()
            .map(format_join_date)
            .unwrap_or_default(),
        computer
            .history_date
            .as_deref()
            .map(format_history_date)
            .unwrap_or_default(),
        text(&computer.history_user),
        join_names(&computer.printers),
        join_names(&computer.scanners),
        join_names(&computer.mfps),
        join_names(&computer.webcam_types),
        join_names(&computer.webcam_models),
        join_names(&computer.monitor_types),
    ]
}

/// Serialize rows (BOM, header, one line per row) into `out`
pub fn write_csv<W: Write>(mut out: W, rows: &[Computer]) -> Result<(), ExportError> {
    if rows.is_empty() {
        return Err(ExportError::EmptyDataset);
    }

    out.write_all(BOM.as_bytes())
        .map_err(|e| convert_csv_error(csv::Error::from(e)))?;

    // Quoting is done by escape_cell; the writer only joins cells.
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    writer
        .write_record(EXPORT_HEADERS.iter().map(|h| escape_cell(h).into_owned()))
        .map_err(convert_csv_error)?;

    for (index, computer) in rows.iter().enumerate() {
        let cells = record_cells(index + 1, computer);
        writer
            .write_record(cells.iter().map(|c| escape_cell(c).into_owned()))
            .map_err(convert_csv_error)?;
    }

    writer
        .flush()
        .map_err(|e| convert_csv_error(csv::Error::from(e)))
}

/// `<base>_<YYYY-MM-DD>.csv`
pub fn export_filename(base: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", base, date.format("%Y-%m-%d"))
}

/// Write the export file into `dir`. The content is built in memory first so
/// a failed serialization never leaves a partial file.
pub fn export_to_file(
    rows: &[Computer],
    dir: &Path,
    base: &str,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows)?;

    let path = dir.join(export_filename(base, date));
    fs::write(&path, buffer).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    log::info!("exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}
