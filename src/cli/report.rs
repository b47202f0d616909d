//! Console report for one valuation run.

use super::ui;
use crate::core::performance::Window;
use crate::core::portfolio::DailyRun;
use chrono::NaiveDate;
use comfy_table::Cell;

/// Renders the per-asset table and the portfolio totals block.
pub fn render(run: &DailyRun, home_currency: &str, today: NaiveDate) -> String {
    let mut table = ui::new_styled_table();

    let mut header = vec![
        ui::header_cell("Ticker"),
        ui::header_cell("Type"),
        ui::header_cell(&format!("Value ({home_currency})")),
        ui::header_cell(&format!("Cost ({home_currency})")),
        ui::header_cell(&format!("P/L ({home_currency})")),
    ];
    for window in Window::ALL {
        header.push(ui::header_cell(&window.to_string()));
    }
    table.set_header(header);

    for row in &run.rows {
        let mut cells = vec![
            Cell::new(&row.ticker),
            Cell::new(row.kind_label),
            ui::money_cell(row.valuation.current_value),
            ui::money_cell(row.valuation.total_cost),
            ui::signed_money_cell(row.valuation.profit_loss()),
        ];
        for window in Window::ALL {
            cells.push(ui::change_cell(row.performance.window(window).percent));
        }
        table.add_row(cells);
    }

    let title = format!("Portfolio valuation for {today}");
    let mut output = format!("{}\n\n", ui::style_text(&title, ui::StyleType::Title));
    output.push_str(&table.to_string());

    let totals = &run.totals;
    let pl_style = if totals.profit_loss >= 0.0 {
        ui::StyleType::Gain
    } else {
        ui::StyleType::Loss
    };
    output.push_str(&format!(
        "\n\n{} {:.2} {home_currency}",
        ui::style_text("Total Current Value:", ui::StyleType::TotalLabel),
        totals.current_value
    ));
    output.push_str(&format!(
        "\n{} {:.2} {home_currency}",
        ui::style_text("Total Cost:         ", ui::StyleType::TotalLabel),
        totals.total_cost
    ));
    output.push_str(&format!(
        "\n{} {}",
        ui::style_text("Total Profit/Loss:  ", ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("{:.2} {home_currency}", totals.profit_loss),
            pl_style
        )
    ));
    output.push_str(&format!(
        "\n{} {:.2}%",
        ui::style_text("Total Return:       ", ui::StyleType::TotalLabel),
        totals.return_pct
    ));

    output
}
