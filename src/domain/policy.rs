#[derive(Clone, Debug)]
pub struct CooldownPolicy {
    pub window_seconds: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied { remaining_seconds: u64 },
}

impl CooldownPolicy {
    /// remaining = window - (now - last); 没有记录 = 从未提交过, 直接放行。
    /// remaining > 0 拒绝, remaining <= 0 即刻放行 (边界无宽限期)。
    pub fn evaluate(&self, last_accepted: Option<i64>, now: i64) -> Decision {
        let Some(last) = last_accepted else {
            return Decision::Allowed;
        };

        let elapsed = (now - last).max(0);
        let remaining = self.window_seconds as i64 - elapsed;

        if remaining > 0 {
            Decision::Denied {
                remaining_seconds: remaining as u64,
            }
        } else {
            Decision::Allowed
        }
    }
}
