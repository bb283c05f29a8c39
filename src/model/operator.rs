use crate::error::Error;

/// One arithmetic operation between two adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

/// Whether a division step may leave a non-integer intermediate value.
///
/// The final comparison against the target is exact either way; this only
/// governs values partway through the left-to-right fold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DivisionPolicy {
    /// `1 / 2 * 4 = 2` is a legal combo: intermediates may be fractional.
    #[default]
    FractionalIntermediates,
    /// Every division step must land on an integer.
    ExactIntermediates,
}

impl Operator {
    pub fn from_char(c: char) -> Result<Self, Error> {
        match c {
            '+' => Ok(Operator::Add),
            '-' => Ok(Operator::Sub),
            '*' => Ok(Operator::Mul),
            '/' => Ok(Operator::Div),
            other => Err(Error::UnsupportedOperation(other)),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// Fold one step: `acc <op> rhs`.
    ///
    /// `None` means the combo is infeasible at this step (zero divisor, a
    /// fractional result under [`DivisionPolicy::ExactIntermediates`], or
    /// arithmetic overflow), not that anything went wrong.
    pub(crate) fn apply(&self, acc: Ratio, rhs: i64, policy: DivisionPolicy) -> Option<Ratio> {
        match self {
            Operator::Add => acc.checked_add(rhs),
            Operator::Sub => acc.checked_sub(rhs),
            Operator::Mul => acc.checked_mul(rhs),
            Operator::Div => {
                let quotient = acc.checked_div(rhs)?;
                match policy {
                    DivisionPolicy::FractionalIntermediates => Some(quotient),
                    DivisionPolicy::ExactIntermediates => {
                        quotient.is_integer().then_some(quotient)
                    }
                }
            }
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Reduced rational with a positive denominator.
///
/// Equation evaluation must compare exactly against an integer target, so
/// division works on num/den pairs rather than floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ratio {
    num: i64,
    den: i64,
}

impl Ratio {
    pub(crate) fn from_int(value: i64) -> Self {
        Ratio { num: value, den: 1 }
    }

    fn reduced(num: i64, den: i64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let sign = if den < 0 { -1 } else { 1 };
        let divisor = gcd(num.unsigned_abs(), den.unsigned_abs()) as i64;
        Some(Ratio {
            num: sign * num / divisor,
            den: sign * den / divisor,
        })
    }

    pub(crate) fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub(crate) fn equals_int(&self, target: i64) -> bool {
        self.den == 1 && self.num == target
    }

    fn checked_add(self, rhs: i64) -> Option<Self> {
        let num = self.num.checked_add(rhs.checked_mul(self.den)?)?;
        Ratio::reduced(num, self.den)
    }

    fn checked_sub(self, rhs: i64) -> Option<Self> {
        self.checked_add(rhs.checked_neg()?)
    }

    fn checked_mul(self, rhs: i64) -> Option<Self> {
        Ratio::reduced(self.num.checked_mul(rhs)?, self.den)
    }

    fn checked_div(self, rhs: i64) -> Option<Self> {
        if rhs == 0 {
            return None;
        }
        Ratio::reduced(self.num, self.den.checked_mul(rhs)?)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    if a == 0 {
        return b.max(1);
    }
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
