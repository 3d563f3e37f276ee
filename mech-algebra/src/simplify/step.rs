/// Possible simplification steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `a*(b+c) = a*b + a*c`
    DistributiveProperty,

    /// `(a+b)^2 = a^2 + 2*a*b + b^2`
    /// etc.
    DistributePower,

    /// `sin(x)^2 + cos(x)^2 = 1`
    /// `a*sin(x)^2 + a*cos(x)^2 = a`
    Pythagorean,
}
