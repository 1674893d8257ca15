use std::fmt::Write;

use crate::model::{Account, TransferPath};
use crate::validate::Endpoints;

/// Render a transfer path as a Graphviz digraph.
///
/// One node per sender or recipient, one edge per transfer labelled with its
/// value and asset owner. Source and sink are highlighted when given.
pub fn render_dot(path: &TransferPath, endpoints: Option<&Endpoints>) -> String {
    let mut dot = String::new();
    dot.push_str("digraph transfers {\n");
    dot.push_str("    rankdir=LR;\n");
    dot.push_str("    node [fontname=\"Helvetica\", fontsize=10, shape=box];\n");
    dot.push_str("    edge [fontname=\"Helvetica\", fontsize=9, color=\"#888888\"];\n");
    let _ = writeln!(dot, "    labelloc=t;\n    label=\"max flow {}\";\n", path.max_flow);

    let mut accounts: Vec<Account> = path
        .transfers
        .iter()
        .flat_map(|t| [t.from, t.to])
        .chain(endpoints.iter().flat_map(|e| [e.source, e.sink]))
        .collect();
    accounts.sort();
    accounts.dedup();

    for account in &accounts {
        let style = match endpoints {
            Some(e) if e.source == *account => ", style=filled, fillcolor=\"#9ad0a8\"",
            Some(e) if e.sink == *account => ", style=filled, fillcolor=\"#e8a6a6\"",
            _ => "",
        };
        let _ = writeln!(
            dot,
            "    \"{account}\" [label=\"{}\"{style}];",
            short_addr(account)
        );
    }

    dot.push('\n');

    for t in &path.transfers {
        let _ = writeln!(
            dot,
            "    \"{}\" -> \"{}\" [label=\"{} ({})\"];",
            t.from,
            t.to,
            t.value,
            short_addr(&t.asset_owner)
        );
    }

    dot.push_str("}\n");
    dot
}

/// `0x1234...abcd` form of an address.
pub fn short_addr(addr: &Account) -> String {
    let s = format!("{addr}");
    if s.len() > 10 {
        format!("{}...{}", &s[..6], &s[s.len() - 4..])
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransferStep;
    use alloy::primitives::{U256, address};

    #[test]
    fn test_render_dot() {
        let a = address!("00000000000000000000000000000000000000aa");
        let b = address!("00000000000000000000000000000000000000bb");
        let path = TransferPath::new(
            U256::from(5),
            vec![TransferStep::new(a, b, a, U256::from(5))],
        );
        let dot = render_dot(&path, Some(&Endpoints::new(a, b)));

        assert!(dot.starts_with("digraph transfers {"));
        assert!(dot.contains("label=\"max flow 5\""));
        assert!(dot.contains(&format!(
            "\"{a}\" -> \"{b}\" [label=\"5 ({})\"]",
            short_addr(&a)
        )));
        assert_eq!(dot.matches("style=filled").count(), 2);
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_short_addr() {
        let a = address!("1234567890123456789012345678901234567890");
        let short = short_addr(&a);
        assert!(short.starts_with("0x1234"));
        assert!(short.ends_with("7890"));
        assert_eq!(short.len(), 13);
    }
}
