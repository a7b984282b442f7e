//! gnuplot heat-map script
//!
//! Wraps the text table in a script that renders `heatmap.png`:
//!
//! ```text
//! intercore -p | gnuplot -p
//! ```

use crate::protocol::Protocol;

const PALETTE: &str = "set palette defined (0 '#80e0e0', 1 '#54e0eb', \
2 '#34d4f3', 3 '#26baf9', 4 '#40a0ff', 5 '#5888e7', \
6 '#6e72d1', 7 '#845cbb', 8 '#9848a7', 9 '#ac3493', \
10 '#c0207f', 11 '#d20e6d', 12 '#e60059', 13 '#f80047', \
14 '#ff0035', 15 '#ff0625', 16 '#ff2113', 17 '#ff3903', \
18 '#ff5400', 19 '#ff6c00', 20 '#ff8400', 21 '#ff9c00', \
22 '#ffb400', 23 '#ffcc00', 24 '#ffe400', 25 '#fffc00')";

const PLOT_COMMAND: &str = "plot '$data' matrix rowheaders columnheaders using 2:1:3 \
notitle with image, \
'$data' matrix rowheaders columnheaders using \
2:1:(sprintf(\"%g\",$3)) notitle with labels #font \",5\"";

/// Plot title, optionally prefixed with a machine name
pub fn title(name: Option<&str>, protocol: Protocol) -> String {
    let prefix = name.map(|n| format!("{} : ", n)).unwrap_or_default();
    format!(
        "{}Inter-core one-way {} latency between CPU cores",
        prefix,
        protocol.label()
    )
}

/// Embed a rendered text table in a complete gnuplot script
pub fn render_plot(table: &str, name: Option<&str>, protocol: Protocol) -> String {
    let mut out = String::new();
    out.push_str("set terminal pngcairo size 800,600 enhanced font \"Verdana,10\"\n");
    out.push_str(&format!("set title \"{}\"\n", title(name, protocol)));
    out.push_str("set xlabel \"CPU\"\n");
    out.push_str("set ylabel \"CPU\"\n");
    out.push_str("set cblabel \"Latency (ns)\"\n");
    out.push_str("set output 'heatmap.png'\n");
    out.push_str("$data << EOD\n");
    out.push_str(table);
    out.push_str("EOD\n");
    out.push_str(PALETTE);
    out.push('\n');
    out.push_str("#set tics font \",7\"\n");
    out.push_str(PLOT_COMMAND);
    out.push('\n');
    out
}
