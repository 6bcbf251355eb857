use crate::catalog::AllocationMatrix;
use crate::domain::model::{
    AllocationResult, EffortResult, RoleAllocation, DAYS_PER_MONTH, HOURS_PER_DAY,
};

/// Distributes category hours over delivery roles through the allocation matrix.
pub struct AllocationReducer<'a> {
    matrix: &'a AllocationMatrix,
}

impl<'a> AllocationReducer<'a> {
    pub fn new(matrix: &'a AllocationMatrix) -> Self {
        Self { matrix }
    }

    /// Hours per selected role, in selection order.
    ///
    /// Unselected roles are omitted, so an empty selection yields no roles and
    /// zero totals. Repeated names are reported once and names the matrix does
    /// not know are skipped.
    pub fn reduce(&self, effort: &EffortResult, selected_roles: &[String]) -> AllocationResult {
        let mut roles: Vec<RoleAllocation> = Vec::new();
        for role in selected_roles.iter().map(String::as_str) {
            if !self.matrix.has_role(role) {
                tracing::debug!("Skipping unknown role '{}'", role);
                continue;
            }
            if roles.iter().any(|r| r.role == role) {
                continue;
            }
            roles.push(self.role_allocation(effort, role));
        }

        let total_hours: f64 = roles.iter().map(|r| r.hours).sum();
        let total_days = total_hours / HOURS_PER_DAY;

        AllocationResult {
            roles,
            total_hours,
            total_days,
            total_months: total_days / DAYS_PER_MONTH,
        }
    }

    fn role_allocation(&self, effort: &EffortResult, role: &str) -> RoleAllocation {
        let hours: f64 = self
            .matrix
            .rows
            .iter()
            .map(|row| effort.category_hours(&row.category) * row.fraction(role))
            .sum();
        let days = hours / HOURS_PER_DAY;

        RoleAllocation {
            role: role.to_string(),
            hours,
            days,
            months: days / DAYS_PER_MONTH,
        }
    }
}
