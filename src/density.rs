/*!
Defines the two-bump target density the inference engines explore, along with
the [`TargetDensity`] trait both engines are generic over.

Densities here are unnormalized: they never integrate to one and are only
meaningful relative to each other. That is all Metropolis-Hastings and the
variational update need, since both work with density ratios and differences.

Coordinates follow screen conventions: the origin is the top-left corner of
the canvas and y grows downward.

# Examples

```rust
use mini_inference::density::{GaussianMixture, Point, TargetDensity};

let target: GaussianMixture<f64> = GaussianMixture::default();

// The dominant bump peaks just above 1 because the minor bump still
// contributes a sliver of density there.
let peak = target.density(Point::new(120.0, 120.0));
assert!(peak > 1.0 && peak < 1.001);
```
*/

use num_traits::Float;

/// A position on the canvas. Also used for proposal offsets and gradients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T: Float> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector from the origin to this point.
    pub fn norm(&self) -> T {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: Point<T>) -> T {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A trait for unnormalized densities over canvas positions.
///
/// Implementors must return a finite, non-negative value for every position
/// the canvas can contain.
pub trait TargetDensity<T: Float> {
    /// Returns the unnormalized density at `at`.
    fn density(&self, at: Point<T>) -> T;
}

/// One isotropic Gaussian bump of a [`GaussianMixture`].
///
/// Components are fixed at construction; weight and variance must be
/// positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixtureComponent<T> {
    weight: T,
    mean: Point<T>,
    variance: T,
}

impl<T: Float> MixtureComponent<T> {
    /// Creates a bump centered at `mean`.
    ///
    /// # Panics
    ///
    /// Panics if `weight` or `variance` is not positive.
    pub fn new(weight: T, mean: Point<T>, variance: T) -> Self {
        assert!(weight > T::zero(), "Component weight must be positive.");
        assert!(variance > T::zero(), "Component variance must be positive.");
        Self {
            weight,
            mean,
            variance,
        }
    }

    pub fn weight(&self) -> T {
        self.weight
    }

    pub fn mean(&self) -> Point<T> {
        self.mean
    }

    pub fn variance(&self) -> T {
        self.variance
    }

    fn eval(&self, at: Point<T>) -> T {
        let two = T::from(2.0).unwrap();
        let dx = at.x - self.mean.x;
        let dy = at.y - self.mean.y;
        self.weight * (-(dx * dx + dy * dy) / (two * self.variance)).exp()
    }
}

/**
An unnormalized mixture of isotropic Gaussian bumps, used as the posterior
stand-in for the whole demonstration.

The value at a point is the sum of `weight * exp(-r^2 / (2 * variance))` over
all components, where `r` is the distance to the component mean. Component
order never changes the value; it is fixed anyway so runs stay reproducible.

The [`Default`] mixture is the reference posterior: a dominant bump at
(120, 120) and a minor one at (280, 200).

# Examples

```rust
use mini_inference::density::{GaussianMixture, MixtureComponent, Point, TargetDensity};

let narrow = GaussianMixture::new(vec![MixtureComponent::new(
    2.0,
    Point::new(0.0, 0.0),
    50.0,
)]);
assert_eq!(narrow.density(Point::new(0.0, 0.0)), 2.0);
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianMixture<T> {
    components: Vec<MixtureComponent<T>>,
}

impl<T: Float> GaussianMixture<T> {
    /// Creates a mixture from its components.
    ///
    /// # Panics
    ///
    /// Panics if `components` is empty.
    pub fn new(components: Vec<MixtureComponent<T>>) -> Self {
        assert!(
            !components.is_empty(),
            "A mixture needs at least one component."
        );
        Self { components }
    }

    /// The components in their fixed evaluation order.
    pub fn components(&self) -> &[MixtureComponent<T>] {
        &self.components
    }
}

impl<T: Float> Default for GaussianMixture<T> {
    fn default() -> Self {
        Self::new(vec![
            MixtureComponent::new(
                T::one(),
                Point::new(T::from(120.0).unwrap(), T::from(120.0).unwrap()),
                T::from(1200.0).unwrap(),
            ),
            MixtureComponent::new(
                T::from(0.6).unwrap(),
                Point::new(T::from(280.0).unwrap(), T::from(200.0).unwrap()),
                T::from(1500.0).unwrap(),
            ),
        ])
    }
}

impl<T: Float> TargetDensity<T> for GaussianMixture<T> {
    fn density(&self, at: Point<T>) -> T {
        self.components
            .iter()
            .fold(T::zero(), |acc, c| acc + c.eval(at))
    }
}
