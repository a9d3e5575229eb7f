//! StarryOS wireless wakelock crate
//!
//! 整合 LicheeRV-Nano-Build AIC8800 WiFi 内核 wakelock 移植：PM + FDRV
//! - PM: wakeup source 注册/持有/释放/限时持有原语（对应 linux/pm_wakeup.h）
//! - FDRV: rwnx wakelock 门面与 rwnx_hw 四个固定句柄（对应 rwnx_wakelock.c）
//!
//! 收发/中断路径持有锁时经 fdrv 门面；平台定时器回调接
//! `wakelock::pm::wakeup_timer_tick` 驱动限时持有的到期释放。

#![no_std]

pub use fdrv;
pub use pm;

/// 驱动初始化时创建 wakelock 上下文
///
/// 对应 LicheeRV rwnx_cfg80211_init 路径里对 aicwf_wakeup_lock_init 的调用：
/// 返回持有四个句柄的 rwnx_hw；某项注册失败对应字段为 None，使用前由调用方检查。
pub fn wakelock_init() -> fdrv::RwnxHw {
    log::info!(target: "wakelock", "wakelock: init rwnx_hw wakelocks (tx/rx/irqrx/pwrctrl)");
    let mut hw = fdrv::RwnxHw::new();
    fdrv::aicwf_wakeup_lock_init(&mut hw);
    hw
}

/// 驱动卸载时销毁 wakelock 上下文
///
/// 对应 LicheeRV rwnx_cfg80211_deinit 路径里对 aicwf_wakeup_lock_deinit 的调用：
/// 逐项释放并注销，四个字段清为 None。
pub fn wakelock_deinit(hw: &mut fdrv::RwnxHw) {
    log::info!(target: "wakelock", "wakelock: deinit rwnx_hw wakelocks");
    fdrv::aicwf_wakeup_lock_deinit(hw);
}
