use crate::types::report::AttractivenessReport;
use crate::types::scoring::{Points, RatingTable};

fn points(value: Points) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn push_table(output: &mut String, table: &RatingTable) {
    output.push_str(&format!("## {}\n\n", table.dimension()));
    output.push_str("| Category | Measured | Score | Max |\n");
    output.push_str("|---|---:|---:|---:|\n");
    for row in table.rows() {
        output.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            row.label,
            row.raw,
            points(row.score),
            points(row.cap)
        ));
    }
    output.push_str(&format!(
        "| **Total** | | **{}** | {} |\n\n",
        points(table.total()),
        points(table.max_total())
    ));
}

pub fn to_markdown(report: &AttractivenessReport) -> String {
    let location = &report.location;
    let mut output = String::new();
    output.push_str("# Attractiveness Report\n\n");
    output.push_str(&format!(
        "Location: {} (department {}), {}\n",
        location.city, location.department, location.coordinates
    ));
    if let Some(iris) = &location.iris {
        output.push_str(&format!("IRIS: {iris}\n"));
    }
    output.push('\n');
    output.push_str(&format!(
        "Attractiveness index: {} ({})\n\n",
        report.index.value, report.index.tier
    ));

    output.push_str("## Indices\n\n");
    for badge in &report.badges {
        output.push_str(&format!(
            "- {}: {} ({})\n",
            badge.dimension,
            points(badge.total),
            badge.tier
        ));
    }
    output.push('\n');

    for table in report.ratings.tables() {
        push_table(&mut output, table);
    }

    output
}
