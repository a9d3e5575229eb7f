//! 驱动硬件上下文 — 对应 rwnx_defs.h 中 struct rwnx_hw 的 wakelock 部分
//!
//! rwnx_hw 独占持有固定四个 wakelock 句柄，由 aicwf_wakeup_lock_init/deinit
//! 统一创建与销毁；门面自身不保存句柄，每次调用显式传入。

use crate::wakelock::WakeLock;

/// 硬件上下文（对应 struct rwnx_hw，仅含 ws_* 字段）
///
/// 字段为 None 表示未注册或注册失败；使用任一锁之前由调用方检查。
pub struct RwnxHw {
    /// 发送路径 wakelock（对应 rwnx_hw->ws_tx）
    pub ws_tx: WakeLock,
    /// 接收路径 wakelock（对应 rwnx_hw->ws_rx）
    pub ws_rx: WakeLock,
    /// 接收中断处理 wakelock（对应 rwnx_hw->ws_irqrx）
    pub ws_irqrx: WakeLock,
    /// 电源控制 wakelock（对应 rwnx_hw->ws_pwrctrl）
    pub ws_pwrctrl: WakeLock,
}

impl RwnxHw {
    /// 四个句柄均为 None 的初始上下文
    pub const fn new() -> Self {
        Self {
            ws_tx: None,
            ws_rx: None,
            ws_irqrx: None,
            ws_pwrctrl: None,
        }
    }
}
