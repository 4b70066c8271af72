use indexmap::IndexMap;

/// One row of the price sheet: column header → cell text, in sheet order.
pub type PriceRecord = IndexMap<String, String>;

/// Render the price list for the prompt, one record per line.
pub fn format_price_list(records: &[PriceRecord]) -> String {
    if records.is_empty() {
        return "Прайс-лист сейчас недоступен. Не называй конкретные цены, предложи уточнить их у менеджера.".to_string();
    }

    records
        .iter()
        .map(|record| {
            let cells: Vec<String> = record
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(column, value)| format!("{}: {}", column, value))
                .collect();
            format!("- {}", cells.join("; "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
