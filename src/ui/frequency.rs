use ratatui::{
    layout::{Alignment, Constraint},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::app::FrequencyOrder;

/// Printable label for a typed character
pub fn char_label(c: char) -> String {
    match c {
        '\t' => "TAB".to_string(),
        c if c.is_control() => format!("U+{:04X}", c as u32),
        c => c.to_string(),
    }
}

/// Pure presenter for a single frequency row
pub fn present_row(character: char, count: usize, most: usize) -> Row<'static> {
    let count_style = if count == most {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Row::new(vec![
        Cell::from(char_label(character)).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(count.to_string()).style(count_style),
    ])
}

fn title(order: FrequencyOrder) -> &'static str {
    match order {
        FrequencyOrder::FirstSeen => "Typed characters (first seen)",
        FrequencyOrder::Count => "Typed characters (most typed)",
    }
}

pub fn frequency_table(rows: &[(char, usize)], order: FrequencyOrder) -> Table<'static> {
    let most = rows.iter().map(|&(_, count)| count).max().unwrap_or(0);
    let header = Row::new(vec![Cell::from("Char"), Cell::from("Count")]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let body: Vec<Row> = rows
        .iter()
        .map(|&(character, count)| present_row(character, count, most))
        .collect();

    Table::new(body, [Constraint::Length(8), Constraint::Min(6)])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title(order)))
        .column_spacing(2)
}

pub fn empty_frequency(order: FrequencyOrder) -> Paragraph<'static> {
    Paragraph::new("No characters typed yet.")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title(title(order)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_label() {
        assert_eq!(char_label('a'), "a");
        assert_eq!(char_label('\t'), "TAB");
        assert_eq!(char_label('\u{7}'), "U+0007");
    }

    #[test]
    fn test_titles_follow_order() {
        assert_ne!(title(FrequencyOrder::FirstSeen), title(FrequencyOrder::Count));
    }
}
