use csv::ReaderBuilder;
use ndarray::{Array2, ArrayView2};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::KMeansConfig;
use crate::engine::{self, RunSummary};
use crate::error::{KMeansError, Result};
use crate::init::{self, Init};

/// The n×d observation matrix that gets clustered.
#[derive(Debug, Clone)]
pub struct DataSet {
    pub data: Array2<f64>,
}

impl DataSet {
    /// Read `n * d` numbers from a text stream. Values may be separated by
    /// commas, whitespace or line breaks; every `d` consecutive values form
    /// one observation. Anything after the first `n * d` values is ignored.
    pub fn from_reader<R: Read>(mut reader: R, n: usize, d: usize) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        let wanted = value_count(n, d)?;
        // n and d come from the caller; size the buffer from what was read
        let mut flat = Vec::with_capacity(wanted.min(text.len() / 2 + 1));
        let tokens = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty());

        for (pos, token) in tokens.take(wanted).enumerate() {
            let value = parse_value(token)
                .map_err(|why| KMeansError::MalformedInput(format!("value {}: {}", pos + 1, why)))?;
            flat.push(value);
        }

        if flat.len() < wanted {
            return Err(KMeansError::MalformedInput(format!(
                "expected {} values for {} observations of dimension {}, found {}",
                wanted,
                n,
                d,
                flat.len()
            )));
        }

        let data = Array2::from_shape_vec((n, d), flat)
            .map_err(|e| KMeansError::Shape(e.to_string()))?;
        Ok(Self { data })
    }

    /// Read a header-less comma separated file. Each record must carry
    /// exactly `d` fields; the first `n` records are used.
    pub fn from_csv<P: AsRef<Path>>(path: P, n: usize, d: usize) -> Result<Self> {
        let file = File::open(&path)?;

        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);

        value_count(n, d)?;
        let mut flat: Vec<f64> = Vec::new();

        for (i, result) in rdr.records().take(n).enumerate() {
            let record = result?;
            if record.len() != d {
                return Err(KMeansError::MalformedInput(format!(
                    "record {} in {:?} has {} fields, expected {}",
                    i + 1,
                    path.as_ref(),
                    record.len(),
                    d
                )));
            }
            for field in record.iter() {
                let value = parse_value(field).map_err(|why| {
                    KMeansError::MalformedInput(format!(
                        "record {} in {:?}: {}",
                        i + 1,
                        path.as_ref(),
                        why
                    ))
                })?;
                flat.push(value);
            }
        }

        let rows = flat.len() / d.max(1);
        if rows < n {
            return Err(KMeansError::MalformedInput(format!(
                "{:?} holds {} observations, expected {}",
                path.as_ref(),
                rows,
                n
            )));
        }

        let data = Array2::from_shape_vec((n, d), flat)
            .map_err(|e| KMeansError::Shape(e.to_string()))?;
        Ok(Self { data })
    }

    /// Adapter for observations that already live in memory, e.g. handed
    /// over by a host program. Every row must have exactly `d` values.
    pub fn from_rows(rows: &[Vec<f64>], d: usize) -> Result<Self> {
        if rows.is_empty() {
            return Err(KMeansError::Shape("no observations given".into()));
        }
        if d == 0 {
            return Err(KMeansError::Shape("observations need at least one dimension".into()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != d) {
            return Err(KMeansError::Shape(format!(
                "observation {} has {} values, expected {}",
                i,
                row.len(),
                d
            )));
        }

        if let Some(pos) = rows.iter().flatten().position(|v| !v.is_finite()) {
            return Err(KMeansError::MalformedInput(format!(
                "observation {} holds a non-finite value",
                pos / d
            )));
        }

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), d), flat)
            .map_err(|e| KMeansError::Shape(e.to_string()))?;
        Ok(Self { data })
    }

    pub fn n(&self) -> usize {
        self.data.nrows()
    }

    pub fn d(&self) -> usize {
        self.data.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Pick the starting centroids with `init` and run the clustering.
    /// Returns the final k×d centroids, the indices the run started from,
    /// and the run summary.
    pub fn kmeans(
        &self,
        config: &KMeansConfig,
        init: &Init,
    ) -> Result<(Array2<f64>, Vec<usize>, RunSummary)> {
        config.validate()?;
        if (self.n(), self.d()) != (config.n, config.d) {
            return Err(KMeansError::Shape(format!(
                "data set is {}x{}, configuration expects {}x{}",
                self.n(),
                self.d(),
                config.n,
                config.d
            )));
        }

        let indices = init.indices(self.view(), config.k)?;
        let mut centroids = init::centroids_from_indices(self.view(), &indices)?;
        let summary = engine::run(self.view(), &mut centroids, config)?;
        Ok((centroids, indices, summary))
    }
}

/// Total number of values for `n` observations of dimension `d`.
fn value_count(n: usize, d: usize) -> Result<usize> {
    n.checked_mul(d).ok_or_else(|| {
        KMeansError::MalformedInput(format!("{n} observations of dimension {d} do not fit in memory"))
    })
}

/// Parse one coordinate. NaN and infinities are refused: a NaN centroid
/// never compares equal, so the run could not converge.
fn parse_value(token: &str) -> std::result::Result<f64, String> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("{token:?} is not a finite number")),
        Err(_) => Err(format!("{token:?} is not a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    #[test]
    fn test_from_reader_mixed_separators() {
        let input = "1,1\n1,3\n5 5\n5,\t7\n";
        let ds = DataSet::from_reader(input.as_bytes(), 4, 2).unwrap();
        assert_eq!(ds.data, array![[1.0, 1.0], [1.0, 3.0], [5.0, 5.0], [5.0, 7.0]]);
    }

    #[test]
    fn test_from_reader_ignores_extra_values() {
        let ds = DataSet::from_reader("1 2 3 4 5".as_bytes(), 2, 2).unwrap();
        assert_eq!(ds.data, array![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_from_reader_too_few_values() {
        let err = DataSet::from_reader("1,2,3".as_bytes(), 2, 2).unwrap_err();
        assert!(matches!(err, KMeansError::MalformedInput(_)));
    }

    #[test]
    fn test_from_reader_non_numeric() {
        let err = DataSet::from_reader("1,2,x,4".as_bytes(), 2, 2).unwrap_err();
        assert!(matches!(err, KMeansError::MalformedInput(_)));
    }

    #[test]
    fn test_from_csv() {
        let path = std::env::temp_dir().join(format!("lloyd_kmeans_{}.csv", std::process::id()));
        {
            let mut f = File::create(&path).unwrap();
            writeln!(f, "1.0,1.0\n1.0, 3.0\n5.0,5.0\n5.0,7.0").unwrap();
        }
        let ds = DataSet::from_csv(&path, 3, 2).unwrap();
        assert_eq!(ds.data, array![[1.0, 1.0], [1.0, 3.0], [5.0, 5.0]]);

        let err = DataSet::from_csv(&path, 5, 2).unwrap_err();
        assert!(matches!(err, KMeansError::MalformedInput(_)));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_reader_huge_n_is_malformed_not_a_panic() {
        let err = DataSet::from_reader("1 2".as_bytes(), 1usize << 61, 1).unwrap_err();
        assert!(matches!(err, KMeansError::MalformedInput(_)));

        let err = DataSet::from_reader("1 2".as_bytes(), usize::MAX, 2).unwrap_err();
        assert!(matches!(err, KMeansError::MalformedInput(_)));
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        for input in ["1,nan,3,4", "1,2,inf,4", "-infinity 2 3 4"] {
            let err = DataSet::from_reader(input.as_bytes(), 2, 2).unwrap_err();
            assert!(matches!(err, KMeansError::MalformedInput(_)), "{input}");
        }
        let err = DataSet::from_rows(&[vec![1.0], vec![f64::NAN]], 1).unwrap_err();
        assert!(matches!(err, KMeansError::MalformedInput(_)));
    }

    #[test]
    fn test_from_csv_ragged_record_and_huge_n() {
        let path = std::env::temp_dir().join(format!("lloyd_kmeans_ragged_{}.csv", std::process::id()));
        {
            let mut f = File::create(&path).unwrap();
            writeln!(f, "1.0,1.0\n1.0,3.0,4.0\n5.0,5.0").unwrap();
        }
        let err = DataSet::from_csv(&path, 3, 2).unwrap_err();
        assert!(matches!(err, KMeansError::MalformedInput(_)));

        let err = DataSet::from_csv(&path, 1usize << 61, 1).unwrap_err();
        assert!(matches!(err, KMeansError::MalformedInput(_)));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_csv_missing_file() {
        let err = DataSet::from_csv("/nonexistent/lloyd_kmeans.csv", 2, 2).unwrap_err();
        assert!(matches!(err, KMeansError::Io(_)));
    }

    #[test]
    fn test_from_rows_checks_shape() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            DataSet::from_rows(&rows, 2).unwrap_err(),
            KMeansError::Shape(_)
        ));
        assert!(DataSet::from_rows(&[], 2).is_err());

        let ds = DataSet::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]], 2).unwrap();
        assert_eq!((ds.n(), ds.d()), (2, 2));
    }

    #[test]
    fn test_kmeans_with_explicit_indices() {
        let rows = vec![vec![1.0, 1.0], vec![1.0, 3.0], vec![5.0, 5.0], vec![5.0, 7.0]];
        let ds = DataSet::from_rows(&rows, 2).unwrap();
        let config = KMeansConfig::new(2, 4, 2, 10);

        let (centroids, indices, summary) =
            ds.kmeans(&config, &Init::Indices(vec![0, 2])).unwrap();

        assert_eq!(indices, vec![0, 2]);
        assert_eq!(centroids, array![[1.0, 2.0], [5.0, 6.0]]);
        assert!(summary.converged);
    }

    #[test]
    fn test_kmeans_rejects_k_equal_n() {
        let ds = DataSet::from_rows(&[vec![1.0], vec![2.0], vec![3.0]], 1).unwrap();
        let config = KMeansConfig::new(3, 3, 1, 10);
        let err = ds.kmeans(&config, &Init::FirstK).unwrap_err();
        assert!(matches!(err, KMeansError::InvalidConfig(_)));
    }
}
