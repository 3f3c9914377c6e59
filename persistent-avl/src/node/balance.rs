//! 平衡状态

/// 节点左右子树的平衡状态
///
/// 由 `height(left) - height(right)` 决定，只有 ±2 需要旋转。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceState {
    /// -2
    UnbalancedRight,
    /// -1
    SlightlyUnbalancedRight,
    /// 0
    Balanced,
    /// +1
    SlightlyUnbalancedLeft,
    /// +2
    UnbalancedLeft,
}

impl BalanceState {
    /// 根据左右子树高度计算平衡状态
    ///
    /// 合法的 AVL 树中高度差只可能落在 [-2, 2]；超出范围说明树已损坏，
    /// debug 构建下直接断言。
    pub fn from_heights(left: i32, right: i32) -> Self {
        let diff = left - right;
        debug_assert!(
            (-2..=2).contains(&diff),
            "height difference {} out of AVL range",
            diff
        );
        match diff {
            d if d <= -2 => BalanceState::UnbalancedRight,
            -1 => BalanceState::SlightlyUnbalancedRight,
            0 => BalanceState::Balanced,
            1 => BalanceState::SlightlyUnbalancedLeft,
            _ => BalanceState::UnbalancedLeft,
        }
    }

    /// 是否需要旋转
    #[inline]
    pub fn needs_rotation(self) -> bool {
        matches!(
            self,
            BalanceState::UnbalancedLeft | BalanceState::UnbalancedRight
        )
    }
}
