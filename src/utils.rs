#[allow(unused)]
use crate::prelude::*;

#[macro_export]
macro_rules! rand_array {
    ($rows:expr, $cols:expr; $low:expr, $high:expr) => {
        {
            Array2::random(($rows, $cols), Uniform::new($low, $high))
        }
    };
    ($rows:expr, $cols:expr; $low:expr, $high:expr; $rng:expr) => {
        {
            Array2::random_using(($rows, $cols), Uniform::new($low, $high), $rng)
        }
    };
}

/// Builds a validated [`Topology`](crate::core::Topology), input layer first.
///
/// ```
/// use rmlp::prelude::*;
/// use rmlp::topology;
///
/// let t = topology!(input 2, dense 3 => Activation::Sigmoid, dense 1 => Activation::Identity).unwrap();
/// assert_eq!(t.len(), 3);
/// ```
#[macro_export]
macro_rules! topology {
    (input $i:expr, $(dense $x:expr => $a:expr),+ $(,)?) => {
        {
            let mut units = vec![$crate::core::Unit::input($i)];
            $(units.push($crate::core::Unit::new($x, $a));)+
            $crate::core::Topology::new(units)
        }
    };
}
