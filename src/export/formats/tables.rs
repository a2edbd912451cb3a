use crate::discrete::types::{EdgeAggregate, NodeAggregate};
use crate::error::{Error, Result};

/// Location aggregate table. Six-decimal formatting, empty cells for
/// absent coordinates; losslessly re-derivable as label/number records.
pub fn render_nodes_csv(nodes: &[NodeAggregate]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "location",
            "ancestral_weight",
            "tip_weight",
            "latitude",
            "longitude",
        ])
        .map_err(csv_error)?;
    for node in nodes {
        writer
            .write_record([
                node.location.clone(),
                format!("{:.6}", node.ancestral_weight),
                format!("{:.6}", node.tip_weight),
                optional(node.latitude),
                optional(node.longitude),
            ])
            .map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))
}

/// Transition aggregate table, one row per (source, destination) pair.
pub fn render_edges_csv(edges: &[EdgeAggregate]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "src",
            "dst",
            "weight",
            "time_median",
            "time_hpd_low",
            "time_hpd_high",
            "bayes_factor",
            "posterior_support",
            "jumps_mean",
            "jumps_hpd_low",
            "jumps_hpd_high",
        ])
        .map_err(csv_error)?;
    for edge in edges {
        writer
            .write_record([
                edge.src.clone(),
                edge.dst.clone(),
                format!("{:.6}", edge.weight),
                optional(edge.time_median),
                optional(edge.time_hpd_low),
                optional(edge.time_hpd_high),
                optional(edge.bayes_factor),
                optional(edge.posterior_support),
                optional(edge.jumps_mean),
                optional(edge.jumps_hpd_low),
                optional(edge.jumps_hpd_high),
            ])
            .map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6}", v)).unwrap_or_default()
}

fn csv_error(error: csv::Error) -> Error {
    Error::Io(std::io::Error::new(std::io::ErrorKind::Other, error.to_string()))
}
