//! Wakelock 门面 — 对应 rwnx_wakelock.c
//!
//! 在 PM wakeup source 原语之上提供统一的创建/销毁/持有/释放/限时持有接口，
//! 屏蔽注册 API 的内核版本差异：>= 5.4 的设备绑定签名与旧的仅名字签名由
//! feature `device-bound` 在构建期选择（对应原 LINUX_VERSION_CODE /
//! CONFIG_PLATFORM_ROCKCHIP 条件编译，压平为单一能力开关）。
//!
//! 句柄为显式可空类型 [`WakeLock`]：None 表示未注册或注册失败，五个运行期
//! 操作对 None 一律安全空操作（对应 C 侧对 NULL 判空直接返回）。本模块自身
//! 不加锁、不阻塞、不睡眠，可在中断/tasklet 上下文调用；持有状态的合并与
//! 并发安全由 pm 侧负责，本门面只保证空句柄安全。

use alloc::sync::Arc;

use pm::WakeupSource;

use crate::defs::RwnxHw;

/// wakelock 句柄：None = 未注册或注册失败，对其所有运行期操作均为安全空操作
pub type WakeLock = Option<Arc<WakeupSource>>;

/// 注册一个不绑定设备的唤醒源（对应 rwnx_wakeup_init）
///
/// 失败返回 None，向调用方传播、不重试。
pub fn rwnx_wakeup_init(name: &str) -> WakeLock {
    #[cfg(feature = "device-bound")]
    return pm::wakeup_source_register(None, name);
    #[cfg(not(feature = "device-bound"))]
    return pm::wakeup_source_register(name);
}

/// 注册绑定到 `dev` 的唤醒源（对应 rwnx_wakeup_register）
///
/// 环境支持设备绑定签名时（feature `device-bound`，对应 >= 5.4 内核）传入
/// dev；旧环境回退仅名字注册。选择在构建期完成，无运行期分支。
pub fn rwnx_wakeup_register(dev: &pm::Device, name: &str) -> WakeLock {
    #[cfg(feature = "device-bound")]
    return pm::wakeup_source_register(Some(dev), name);
    #[cfg(not(feature = "device-bound"))]
    {
        let _ = dev;
        return pm::wakeup_source_register(name);
    }
}

/// 注销并销毁句柄（对应 rwnx_wakeup_deinit）；None 时为空操作
///
/// 仍处于持有状态时先释放，绝不销毁持有中的唤醒源（否则睡眠抑制计数失衡）。
/// 句柄被消费，此后不可复用。
pub fn rwnx_wakeup_deinit(ws: WakeLock) {
    let ws = match ws {
        Some(ws) => ws,
        None => return,
    };
    if ws.is_active() {
        ws.relax();
    }
    pm::wakeup_source_unregister(ws);
}

/// 与 [`rwnx_wakeup_deinit`] 语义一致（对应 rwnx_wakeup_unregister），
/// 与 [`rwnx_wakeup_register`] 成对使用
pub fn rwnx_wakeup_unregister(ws: WakeLock) {
    rwnx_wakeup_deinit(ws)
}

/// 持有，抑制系统挂起（对应 rwnx_wakeup_lock → __pm_stay_awake）
///
/// None 空操作；幂等，重复持有仅保持持有，合并由 pm 侧完成。
pub fn rwnx_wakeup_lock(ws: &WakeLock) {
    log::debug!(target: "wakelock::fdrv", "rwnx_wakeup_lock enter");
    if let Some(ws) = ws {
        ws.stay_awake();
    }
}

/// 释放持有（对应 rwnx_wakeup_unlock → __pm_relax）
///
/// None 空操作；对已释放的源幂等。
pub fn rwnx_wakeup_unlock(ws: &WakeLock) {
    log::debug!(target: "wakelock::fdrv", "rwnx_wakeup_unlock enter");
    if let Some(ws) = ws {
        ws.relax();
    }
}

/// 限时持有至多 `msec` 毫秒（对应 rwnx_wakeup_lock_timeout → __pm_wakeup_event）
///
/// 到期由 pm 侧自动释放，无需配对 unlock；msec 原样转发（含 0）。
/// 用于一次中断处理这类瞬态持有需求。
pub fn rwnx_wakeup_lock_timeout(ws: &WakeLock, msec: u32) {
    if let Some(ws) = ws {
        ws.wakeup_event(msec);
    }
}

/// 创建 rwnx_hw 的四个固定 wakelock（对应 aicwf_wakeup_lock_init）
///
/// 固定顺序注册 tx/rx/irqrx/pwrctrl；某项失败不回滚其余项，
/// 使用任一锁之前由调用方检查对应字段。
pub fn aicwf_wakeup_lock_init(rwnx_hw: &mut RwnxHw) {
    rwnx_hw.ws_tx = rwnx_wakeup_init("rwnx_tx_wakelock");
    rwnx_hw.ws_rx = rwnx_wakeup_init("rwnx_rx_wakelock");
    rwnx_hw.ws_irqrx = rwnx_wakeup_init("rwnx_irqrx_wakelock");
    rwnx_hw.ws_pwrctrl = rwnx_wakeup_init("rwnx_pwrcrl_wakelock");
}

/// 销毁四个 wakelock 并清空字段（对应 aicwf_wakeup_lock_deinit 的 deinit + 置 NULL）
///
/// 各项空句柄安全、互不依赖；逐项 take 后 deinit，字段留下 None 防止复用失效句柄。
pub fn aicwf_wakeup_lock_deinit(rwnx_hw: &mut RwnxHw) {
    rwnx_wakeup_deinit(rwnx_hw.ws_tx.take());
    rwnx_wakeup_deinit(rwnx_hw.ws_rx.take());
    rwnx_wakeup_deinit(rwnx_hw.ws_irqrx.take());
    rwnx_wakeup_deinit(rwnx_hw.ws_pwrctrl.take());
}
