use ndarray::ArrayView2;
use std::io::{self, Write};

/// Decimal places used for the centroid table unless told otherwise.
pub const DEFAULT_PRECISION: usize = 2;

/// One centroid per line, values comma separated and fixed to `precision`
/// decimals.
pub fn format_centroids(centroids: ArrayView2<f64>, precision: usize) -> String {
    let mut out = String::new();
    for row in centroids.outer_iter() {
        let line = row
            .iter()
            .map(|v| format!("{:.*}", precision, v))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn write_centroids<W: Write>(
    mut writer: W,
    centroids: ArrayView2<f64>,
    precision: usize,
) -> io::Result<()> {
    writer.write_all(format_centroids(centroids, precision).as_bytes())?;
    writer.flush()
}

/// The k-means++ index line, e.g. `3,0,7`.
pub fn format_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_default_precision() {
        let c = array![[1.0, 2.0], [5.0, 6.0]];
        assert_eq!(format_centroids(c.view(), DEFAULT_PRECISION), "1.00,2.00\n5.00,6.00\n");
    }

    #[test]
    fn test_custom_precision() {
        let c = array![[1.0 / 3.0, -2.5], [2.0 / 3.0, 10.0]];
        assert_eq!(
            format_centroids(c.view(), 6),
            "0.333333,-2.500000\n0.666667,10.000000\n"
        );
        assert_eq!(format_centroids(c.view(), 1), "0.3,-2.5\n0.7,10.0\n");
    }

    #[test]
    fn test_write_centroids() {
        let c = array![[0.125]];
        let mut buf = Vec::new();
        write_centroids(&mut buf, c.view(), 3).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "0.125\n");
    }

    #[test]
    fn test_format_indices() {
        assert_eq!(format_indices(&[3, 0, 7]), "3,0,7");
    }
}
