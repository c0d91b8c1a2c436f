use crate::error::PlanboardError;

pub type PlanboardResult<T> = Result<T, PlanboardError>;
