//! Largest-remainder (Hamilton) apportionment.
//!
//! Splits an amount across weighted needs so every share is a whole number of
//! `unit`s (except for a sub-unit residue, see [`largest_remainder`]) and the
//! shares add up to exactly the amount divided.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("allocation unit must be positive, got {0}")]
    InvalidUnit(Decimal),
    #[error("cannot apportion negative amount {0}")]
    NegativeAmount(Decimal),
    #[error("amount {total} exceeds combined need {need}")]
    ExceedsNeed { total: Decimal, need: Decimal },
    #[error("amounts too large to apportion in units of {unit}")]
    Overflow { unit: Decimal },
}

/// Apportions `total` across `needs` in proportion to each need.
///
/// Each ideal share `need_i * total / Σ need` is floored to a multiple of
/// `unit`; the units still owed go one at a time to the largest fractional
/// remainders, ties resolved by position. When `total` itself is not a whole
/// number of units the final sub-unit residue lands on the next share in
/// that order. No share ever exceeds its need.
///
/// `total` must not exceed `Σ needs`; when it equals it the needs are
/// returned unchanged.
pub fn largest_remainder(
    total: Decimal,
    needs: &[Decimal],
    unit: Decimal,
) -> Result<Vec<Decimal>, AllocationError> {
    if unit <= Decimal::ZERO {
        return Err(AllocationError::InvalidUnit(unit));
    }
    if total < Decimal::ZERO {
        return Err(AllocationError::NegativeAmount(total));
    }
    if let Some(negative) = needs.iter().find(|need| **need < Decimal::ZERO) {
        return Err(AllocationError::NegativeAmount(*negative));
    }
    let need: Decimal = needs.iter().copied().sum();
    if total > need {
        return Err(AllocationError::ExceedsNeed { total, need });
    }
    if total.is_zero() {
        return Ok(vec![Decimal::ZERO; needs.len()]);
    }
    if total == need {
        return Ok(needs.to_vec());
    }

    let overflow = || AllocationError::Overflow { unit };
    let mut shares = Vec::with_capacity(needs.len());
    let mut remainders = Vec::with_capacity(needs.len());
    for &weight in needs {
        let ideal = ideal_share(weight, total, need).ok_or_else(overflow)?;
        let floored = ideal
            .checked_div(unit)
            .and_then(|units| units.floor().checked_mul(unit))
            .ok_or_else(overflow)?
            .min(weight);
        shares.push(floored);
        remainders.push(ideal - floored);
    }

    // Stable sort: equal remainders keep their original order.
    let mut order: Vec<usize> = (0..needs.len()).collect();
    order.sort_by(|&left, &right| remainders[right].cmp(&remainders[left]));

    let mut owed = total - shares.iter().copied().sum::<Decimal>();
    // A share rounded up in the last digit can overshoot; take it back from
    // the smallest remainders first.
    for &index in order.iter().rev() {
        if owed >= Decimal::ZERO {
            break;
        }
        let take = unit.min(-owed).min(shares[index]);
        shares[index] -= take;
        owed += take;
    }
    while owed > Decimal::ZERO {
        let mut granted_any = false;
        for &index in &order {
            if owed <= Decimal::ZERO {
                break;
            }
            let room = needs[index] - shares[index];
            let grant = unit.min(owed).min(room);
            if grant > Decimal::ZERO {
                shares[index] += grant;
                owed -= grant;
                granted_any = true;
            }
        }
        if !granted_any {
            break;
        }
    }

    Ok(shares)
}

/// `weight * total / need`, multiplying first for precision and dividing
/// first when the product does not fit.
fn ideal_share(weight: Decimal, total: Decimal, need: Decimal) -> Option<Decimal> {
    weight
        .checked_mul(total)
        .and_then(|product| product.checked_div(need))
        .or_else(|| total.checked_div(need)?.checked_mul(weight))
}
