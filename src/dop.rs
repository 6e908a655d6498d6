//! Line of sight geometry and Dilution of Precision
use nalgebra::{Matrix3, MatrixXx3};

use crate::{
    observer::Observer,
    position::EarthFixedPosition,
    prelude::{Error, Vector3},
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// (GᵀG) determinant below which the geometry is declared rank deficient.
/// Rows are unit vectors, so a healthy geometry has a determinant close to (N/3)³.
const SINGULARITY_THRESHOLD: f64 = 1.0E-10;

/// [GeometryMatrix] stacks the unit line of sight vectors, from the observer
/// to each satellite of one subset. Rows follow the subset order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryMatrix {
    g: MatrixXx3<f64>,
}

impl GeometryMatrix {
    /// Builds new [GeometryMatrix] from (identifier, position) pairs and the
    /// observer [EarthFixedPosition].
    pub fn new<'a, I>(satellites: I, observer: &EarthFixedPosition) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a EarthFixedPosition)>,
    {
        let mut rows = Vec::<Vector3<f64>>::new();

        for (id, position) in satellites {
            let los_km = position.ecef_km - observer.ecef_km;
            let range_km = los_km.norm();

            if range_km == 0.0 || !range_km.is_finite() {
                return Err(Error::ZeroRange(id.to_string()));
            }

            rows.push(los_km / range_km);
        }

        let mut g = MatrixXx3::<f64>::zeros(rows.len());

        for (i, row) in rows.iter().enumerate() {
            for j in 0..3 {
                g[(i, j)] = row[j];
            }
        }

        Ok(Self { g })
    }

    /// Number of rows (satellites)
    pub fn nrows(&self) -> usize {
        self.g.nrows()
    }

    /// Returns unit line of sight of given row
    pub fn line_of_sight(&self, row: usize) -> Option<Vector3<f64>> {
        if row < self.g.nrows() {
            Some(Vector3::new(
                self.g[(row, 0)],
                self.g[(row, 1)],
                self.g[(row, 2)],
            ))
        } else {
            None
        }
    }

    /// Returns (GᵀG)⁻¹, expressed in ECEF axes.
    pub fn covariance(&self) -> Result<Matrix3<f64>, Error> {
        if self.g.nrows() < 3 {
            return Err(Error::DegenerateGeometry);
        }

        let gt_g: Matrix3<f64> = self.g.transpose() * &self.g;

        if gt_g.determinant().abs() < SINGULARITY_THRESHOLD {
            return Err(Error::DegenerateGeometry);
        }

        let q = gt_g.try_inverse().ok_or(Error::DegenerateGeometry)?;

        let healthy = (0..3).all(|i| q[(i, i)].is_finite() && q[(i, i)] >= 0.0);

        if healthy {
            Ok(q)
        } else {
            Err(Error::DegenerateGeometry)
        }
    }

    /// Simplified position DOP: √trace((GᵀG)⁻¹).
    ///
    /// This is not the textbook PDOP: G has no clock bias column,
    /// so the receiver clock is assumed known. Values are lower than
    /// a 4-parameter PDOP computed on the same geometry.
    pub fn simplified_dop(&self) -> Result<f64, Error> {
        let q = self.covariance()?;
        Ok(q.trace().sqrt())
    }
}

/// Dilution of Precision of one satellite subset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DilutionOfPrecision {
    /// Simplified (clock free) position DOP, see [GeometryMatrix::simplified_dop]
    pub position: f64,

    /// Horizontal DOP
    pub hdop: f64,

    /// Vertical DOP
    pub vdop: f64,
}

impl DilutionOfPrecision {
    /// Rotates the ECEF covariance into the local NEU axes of the [Observer].
    pub(crate) fn q_neu(q_ecef: &Matrix3<f64>, observer: &Observer) -> Matrix3<f64> {
        let r = observer.ecef_to_neu();
        r * q_ecef * r.transpose()
    }

    /// Builds new [DilutionOfPrecision] from [GeometryMatrix] as seen from [Observer].
    pub fn new(g: &GeometryMatrix, observer: &Observer) -> Result<Self, Error> {
        let q_ecef = g.covariance()?;
        let q_neu = Self::q_neu(&q_ecef, observer);

        Ok(Self {
            position: q_ecef.trace().sqrt(),
            hdop: (q_neu[(0, 0)] + q_neu[(1, 1)]).sqrt(),
            vdop: q_neu[(2, 2)].sqrt(),
        })
    }
}

/// Pure simplified DOP computation over one subset of (identifier, position)
/// pairs, against an observer position. Never has side effects, may be called
/// for every fault hypothesis.
pub fn simplified_dop<'a, I>(satellites: I, observer: &EarthFixedPosition) -> Result<f64, Error>
where
    I: IntoIterator<Item = (&'a str, &'a EarthFixedPosition)>,
{
    GeometryMatrix::new(satellites, observer)?.simplified_dop()
}

#[cfg(test)]
mod test {
    use super::{simplified_dop, DilutionOfPrecision, GeometryMatrix};
    use crate::{observer::Observer, position::EarthFixedPosition, prelude::Error};

    fn tetrahedron(
        observer: &EarthFixedPosition,
        range_km: f64,
    ) -> Vec<(String, EarthFixedPosition)> {
        let s = 1.0 / 3.0_f64.sqrt();
        [(s, s, s), (s, -s, -s), (-s, s, -s), (-s, -s, s)]
            .iter()
            .enumerate()
            .map(|(i, (x, y, z))| {
                (
                    format!("G{:02}", i + 1),
                    EarthFixedPosition::from_km(
                        observer.ecef_km[0] + range_km * x,
                        observer.ecef_km[1] + range_km * y,
                        observer.ecef_km[2] + range_km * z,
                    ),
                )
            })
            .collect()
    }

    #[test]
    fn unit_rows() {
        let observer = EarthFixedPosition::from_km(1.0, 2.0, 3.0);
        let sats = tetrahedron(&observer, 20200.0);
        let g = GeometryMatrix::new(sats.iter().map(|(id, p)| (id.as_str(), p)), &observer)
            .unwrap();
        assert_eq!(g.nrows(), 4);
        for i in 0..4 {
            let los = g.line_of_sight(i).unwrap();
            assert!((los.norm() - 1.0).abs() < 1.0E-12);
        }
        assert!(g.line_of_sight(4).is_none());
    }

    #[test]
    fn tetrahedron_dop() {
        let observer = Observer::new(13.683529, 100.619786, 0.0).unwrap();
        let sats = tetrahedron(&observer.earth_fixed(), 20200.0);
        let g = GeometryMatrix::new(
            sats.iter().map(|(id, p)| (id.as_str(), p)),
            &observer.earth_fixed(),
        )
        .unwrap();

        let dop = DilutionOfPrecision::new(&g, &observer).unwrap();
        assert!((dop.position - 1.5).abs() < 1.0E-9, "dop={}", dop.position);

        // isotropic covariance: any rotation preserves it
        assert!((dop.hdop - 2.0_f64.sqrt() * 0.75_f64.sqrt()).abs() < 1.0E-9);
        assert!((dop.vdop - 0.75_f64.sqrt()).abs() < 1.0E-9);
        assert!((dop.hdop.powi(2) + dop.vdop.powi(2) - dop.position.powi(2)).abs() < 1.0E-9);
    }

    #[test]
    fn zero_range() {
        let observer = EarthFixedPosition::from_km(6378.137, 0.0, 0.0);
        let mut sats = tetrahedron(&observer, 20200.0);
        sats.push(("G05".to_string(), observer));
        assert_eq!(
            simplified_dop(sats.iter().map(|(id, p)| (id.as_str(), p)), &observer),
            Err(Error::ZeroRange("G05".to_string()))
        );
    }

    #[test]
    fn not_enough_rows() {
        let observer = EarthFixedPosition::from_km(6378.137, 0.0, 0.0);
        let sats = tetrahedron(&observer, 20200.0);
        assert_eq!(
            simplified_dop(sats.iter().take(2).map(|(id, p)| (id.as_str(), p)), &observer),
            Err(Error::DegenerateGeometry)
        );
        assert_eq!(
            simplified_dop(
                std::iter::empty::<(&str, &EarthFixedPosition)>(),
                &observer
            ),
            Err(Error::DegenerateGeometry)
        );
    }
}
