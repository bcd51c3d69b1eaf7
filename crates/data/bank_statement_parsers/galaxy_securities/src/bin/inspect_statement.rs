use anyhow::{anyhow, Result};
use std::env;

use galaxy_parser::columns::ALL_ANCHORS;
use galaxy_parser::excel::{load_grid, read_header};

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: inspect_statement <statement.xls[x]>"))?;

    let grid = load_grid(&path)?;
    println!("{}", path);
    println!("  size (blank rows/cols removed): rows={}, cols={}", grid.height(), grid.width());

    // First 15 rows, up to 12 columns
    for (r_idx, row) in grid.rows().take(15).enumerate() {
        let mut cells: Vec<String> = row.iter().take(12).map(|c| c.to_string()).collect();

        // Trim trailing empties for readability
        while matches!(cells.last(), Some(s) if s.is_empty()) {
            cells.pop();
        }
        println!("  row {:>4}: {}", r_idx, cells.join(" | "));
    }

    println!("\n  anchors:");
    for label in ALL_ANCHORS {
        match grid.locate(label) {
            Some(a) => println!("    {:<8} row {:>4}, col {:>2}", label, a.row, a.col),
            None => println!("    {:<8} (not found)", label),
        }
    }

    match read_header(&grid) {
        Ok(header) => println!("\n  account: {}, statement date: {}", header.account, header.date),
        Err(e) => println!("\n  header: {}", e),
    }

    Ok(())
}
