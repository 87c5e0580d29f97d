pub mod solomon;
use std::borrow::Cow;

pub trait FromRaw<T> where Self: Sized {
  fn from_raw(raw: T, id: Cow<str>) -> crate::Result<Self>;
}


pub mod metrics {
  use num_traits::{AsPrimitive, Num};

  pub trait Metric {
    const SYM: bool = false;

    fn compute<T: Num + AsPrimitive<f64>>(p1: (T, T), p2: (T, T)) -> f64;
  }


  pub struct Euclidean();

  impl Metric for Euclidean {
    const SYM: bool = true;

    fn compute<T: Num + AsPrimitive<f64>>(p1: (T, T), p2: (T, T)) -> f64 {
      let a = p1.0.as_() - p2.0.as_();
      let b = p1.1.as_() - p2.1.as_();
      (a*a + b*b).sqrt()
    }
  }

  /// Compute the dense, row-major distance matrix for the given coordinates.  Entry `i*n + j` is the
  /// distance from `coords[i]` to `coords[j]`.
  pub fn dist_matrix<M, T>(_metric: M, coords: &[(T, T)]) -> Vec<f64>
    where
      M: Metric,
      T: Num + AsPrimitive<f64>
  {
    let n = coords.len();
    let mut matrix = vec![0.0; n * n];
    if M::SYM {
      for i in 0..n {
        let p1 = coords[i];
        for j in (i+1)..n {
          let d = M::compute(p1, coords[j]);
          matrix[i * n + j] = d;
          matrix[j * n + i] = d;
        }
        matrix[i * n + i] = M::compute(p1, p1);
      }
    } else {
      for i in 0..n {
        for j in 0..n {
          matrix[i * n + j] = M::compute(coords[i], coords[j]);
        }
      }
    }
    matrix
  }

}
