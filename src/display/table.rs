use crate::api::models::{Computer, FilterOptions, Section};
use crate::core::services::CardCount;
use crate::core::sort::sort_departments;
use crate::core::source::{DataSource, Pagination};
use crate::core::filters::FilterState;
use crate::export::csv::format_history_date;
use crate::utils::text::truncate_text_unicode;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use crossterm::terminal;

const COMPUTER_HEADERS: [&str; 10] = [
    "№",
    "Цех",
    "Отдел",
    "Пользователь",
    "Тип",
    "IP адрес",
    "Интернет",
    "Изменено",
    "Кем",
    "Slug",
];

/// Widest text kept in a computer table cell
const CELL_WIDTH: usize = 28;

pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }

    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _)) => {
                let width = cols as usize;
                Some(width.clamp(40, 200))
            }
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn bold_header(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).add_attribute(Attribute::Bold).fg(color)
        } else {
            Cell::new(text).add_attribute(Attribute::Bold)
        }
    }

    fn colored_cell(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn new_table(&self, headers: &[&str], color: Color) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            table.set_width(width as u16);
        }
        let cells: Vec<Cell> = headers.iter().map(|h| self.bold_header(h, color)).collect();
        table.set_header(cells);
        table
    }

    /// One page of computers; `first_number` is the 1-based number of the
    /// first row
    pub fn render_computers(&self, rows: &[Computer], first_number: usize) -> String {
        if rows.is_empty() {
            return "No computers found.".to_string();
        }

        let mut table = self.new_table(&COMPUTER_HEADERS, Color::Cyan);
        for (index, computer) in rows.iter().enumerate() {
            let text = |value: Option<&str>| truncate_text_unicode(value.unwrap_or("-"), CELL_WIDTH);
            let internet = if computer.internet {
                self.colored_cell("Да", Color::Green)
            } else {
                self.colored_cell("Нет", Color::DarkGrey)
            };
            let changed = computer
                .history_date
                .as_deref()
                .map(format_history_date)
                .unwrap_or_else(|| "-".to_string());

            table.add_row(vec![
                self.colored_cell(&(first_number + index).to_string(), Color::Cyan),
                Cell::new(text(computer.department_name())),
                Cell::new(text(computer.section_name())),
                Cell::new(text(computer.user.as_deref())),
                Cell::new(text(computer.hardware_type_name())),
                Cell::new(text(computer.ip_address.as_deref())),
                internet,
                Cell::new(changed),
                Cell::new(text(computer.history_user.as_deref())),
                self.colored_cell(&computer.slug, Color::DarkGrey),
            ]);
        }

        table.to_string()
    }

    /// Status line above the table: mode, page and row range
    pub fn render_page_header(&self, pagination: &Pagination, source: &DataSource) -> String {
        let mode = match source.statistic_key() {
            Some(key) => format!("Statistic: {}", key),
            None => "All computers".to_string(),
        };

        if pagination.total == 0 {
            return format!("{} | no records", mode);
        }

        let (start, end) = pagination.window(pagination.total);
        format!(
            "{} | page {} of {} | rows {}-{} of {}",
            mode,
            pagination.page_number(),
            pagination.total_pages().max(1),
            (start + 1).min(pagination.total),
            end,
            pagination.total
        )
    }

    pub fn render_filters(&self, filters: &FilterState, search: &str) -> String {
        let mut parts: Vec<String> = filters
            .active()
            .into_iter()
            .map(|(column, value)| format!("{}={}", column, value))
            .collect();
        if !search.is_empty() {
            parts.push(format!("search=\"{}\"", search));
        }

        if parts.is_empty() {
            "Filters: none".to_string()
        } else {
            format!("Filters: {}", parts.join(", "))
        }
    }

    pub fn render_options(&self, options: &FilterOptions) -> String {
        let mut table = self.new_table(&["Filter", "Options"], Color::Green);

        let departments: Vec<String> = sort_departments(&options.departments)
            .into_iter()
            .map(|d| d.name)
            .collect();
        let sections: Vec<&str> = options.sections.iter().map(|s| s.raw_name.as_str()).collect();
        let types: Vec<&str> = options
            .type_compyuters
            .iter()
            .map(|t| t.name.as_str())
            .collect();

        table.add_row(vec![Cell::new("department"), Cell::new(departments.join(", "))]);
        table.add_row(vec![Cell::new("section"), Cell::new(sections.join(", "))]);
        table.add_row(vec![Cell::new("type"), Cell::new(types.join(", "))]);
        table.add_row(vec![Cell::new("ip"), Cell::new(options.ip_addresses.join(", "))]);
        table.add_row(vec![Cell::new("user"), Cell::new(options.users.join(", "))]);

        table.to_string()
    }

    pub fn render_sections(&self, sections: &[Section]) -> String {
        if sections.is_empty() {
            return "No sections found.".to_string();
        }

        let mut table = self.new_table(&["ID", "Section"], Color::Green);
        for section in sections {
            table.add_row(vec![
                self.colored_cell(&section.id.to_string(), Color::Cyan),
                Cell::new(&section.raw_name),
            ]);
        }
        table.to_string()
    }

    pub fn render_cards(&self, cards: &[CardCount]) -> String {
        let mut table = self.new_table(&["Card", "Alias", "Count"], Color::Yellow);
        for card in cards {
            table.add_row(vec![
                Cell::new(card.card.title()),
                self.colored_cell(card.card.alias(), Color::DarkGrey),
                self.colored_cell(&card.count.to_string(), Color::Cyan),
            ]);
        }
        table.to_string()
    }

    pub fn render_config(&self, entries: &[(&str, String)]) -> String {
        let mut table = self.new_table(&["Key", "Value"], Color::Green);
        for (key, value) in entries {
            table.add_row(vec![Cell::new(key), Cell::new(value)]);
        }
        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{Department, NamedRef};
    use crate::core::filters::FilterColumn;
    use crate::core::services::StatisticCard;

    fn display() -> TableDisplay {
        TableDisplay::new().with_colors(false).with_max_width(200)
    }

    #[test]
    fn test_render_computers() {
        let rows = vec![Computer {
            slug: "pc-17".to_string(),
            department: Some(NamedRef {
                id: Some(2),
                name: "2-цех".to_string(),
            }),
            user: Some("Иванов".to_string()),
            internet: true,
            history_date: Some("2024-03-05T10:12:00Z".to_string()),
            ..Default::default()
        }];

        let output = display().render_computers(&rows, 51);
        assert!(output.contains("51"));
        assert!(output.contains("2-цех"));
        assert!(output.contains("Иванов"));
        assert!(output.contains("05.03.2024, 10:12:00"));
        assert!(output.contains("pc-17"));
    }

    #[test]
    fn test_render_empty_page() {
        assert_eq!(display().render_computers(&[], 1), "No computers found.");
    }

    #[test]
    fn test_page_header() {
        let pagination = Pagination {
            offset: 50,
            page_size: 50,
            total: 120,
        };
        assert_eq!(
            display().render_page_header(&pagination, &DataSource::Live),
            "All computers | page 2 of 3 | rows 51-100 of 120"
        );

        let source = DataSource::preselected("МФУ", Vec::new());
        let empty = Pagination::default();
        assert_eq!(
            display().render_page_header(&empty, &source),
            "Statistic: МФУ | no records"
        );
    }

    #[test]
    fn test_render_filters() {
        let mut filters = FilterState::default();
        assert_eq!(display().render_filters(&filters, ""), "Filters: none");

        filters.select_department("2-цех");
        filters.set_text(FilterColumn::IpAddress, "10.0.0.1");
        assert_eq!(
            display().render_filters(&filters, "hp"),
            "Filters: department=2-цех, ip=10.0.0.1, search=\"hp\""
        );
    }

    #[test]
    fn test_render_options_sorts_departments() {
        let options = FilterOptions {
            departments: vec![
                Department {
                    id: 1,
                    name: "10-цех".to_string(),
                },
                Department {
                    id: 2,
                    name: "2-цех".to_string(),
                },
            ],
            ..Default::default()
        };
        let output = display().render_options(&options);
        assert!(output.contains("2-цех, 10-цех"));
    }

    #[test]
    fn test_render_cards() {
        let cards = vec![CardCount {
            card: StatisticCard::Printers,
            count: 14,
        }];
        let output = display().render_cards(&cards);
        assert!(output.contains("Принтеры"));
        assert!(output.contains("printers"));
        assert!(output.contains("14"));
    }
}
