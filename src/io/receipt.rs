use crate::domain::{format_cents, Customer, Sale};

/// Shop name printed on receipts when none is configured.
pub const DEFAULT_MARKET_NAME: &str = "MERCADO DO ZE";

const WIDTH: usize = 38;

/// Render a printable fiado receipt for a registered sale.
///
/// Pure projection of a `(Sale, Customer)` pair: the customer snapshot must be
/// the one taken after the sale's total was added to the debt, so the prior
/// debt line is `current_debt - total`. Performs no mutation.
pub fn render_receipt(sale: &Sale, customer: &Customer, market_name: &str) -> String {
    let mut out = String::new();
    let rule = "-".repeat(WIDTH);

    out.push_str(&center(market_name));
    out.push_str(&center("COMPROVANTE DE COMPRA FIADO"));
    out.push_str(&rule);
    out.push('\n');

    out.push_str(&spread("Data:", &sale.date.format("%d/%m/%Y %H:%M").to_string()));
    out.push_str(&spread(
        "Vencimento:",
        &sale.due_date.format("%d/%m/%Y").to_string(),
    ));
    out.push_str(&spread("Cliente:", &customer.name));
    out.push_str(&rule);
    out.push('\n');

    out.push_str("PRODUTOS:\n");
    for item in &sale.items {
        out.push_str(&spread(&item.product, &money(item.value_cents)));
    }
    out.push_str(&spread("TOTAL:", &money(sale.total_cents)));
    out.push_str(&rule);
    out.push('\n');

    let prior_debt = customer.current_debt_cents - sale.total_cents;
    out.push_str(&spread("Divida Anterior:", &money(prior_debt)));
    out.push_str(&spread("Divida Total:", &money(customer.current_debt_cents)));
    out.push_str(&spread("Limite:", &money(customer.credit_limit_cents)));
    out.push_str(&rule);
    out.push('\n');

    out.push_str(&center("ASSINATURA DO CLIENTE"));
    out.push('\n');
    out.push_str(&center(&".".repeat(WIDTH - 8)));
    out.push_str(&center(&customer.name));
    out.push('\n');

    out.push_str(&center("Obrigado pela preferencia!"));
    out.push_str(&center("Este e um comprovante de divida."));

    out
}

fn money(cents: i64) -> String {
    format!("R$ {}", format_cents(cents))
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= WIDTH {
        return format!("{}\n", text);
    }
    let pad = (WIDTH - len) / 2;
    format!("{}{}\n", " ".repeat(pad), text)
}

fn spread(left: &str, right: &str) -> String {
    let used = left.chars().count() + right.chars().count();
    if used + 1 > WIDTH {
        // Too long for one line; fall back to two.
        return format!("{}\n{:>width$}\n", left, right, width = WIDTH);
    }
    format!("{}{}{}\n", left, " ".repeat(WIDTH - used), right)
}
