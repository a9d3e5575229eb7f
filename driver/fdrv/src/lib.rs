//! AIC8800 wakelock 驱动侧 (FDRV)
//!
//! 对应 LicheeRV-Nano-Build/osdrv/extdrv/wireless/aic8800/aic8800_fdrv/：
//! - rwnx_wakelock.c / rwnx_wakelock.h：wakelock 门面（创建/销毁/持有/释放/限时持有）
//! - rwnx_defs.h：struct rwnx_hw 的 ws_tx/ws_rx/ws_irqrx/ws_pwrctrl 四个句柄
//!
//! 收发与中断路径在持有/释放这些锁时只经过本门面，不直接触碰 PM 原语。

#![no_std]

extern crate alloc;

mod defs;
mod wakelock;

pub use defs::RwnxHw;
pub use wakelock::{
    aicwf_wakeup_lock_deinit, aicwf_wakeup_lock_init, rwnx_wakeup_deinit, rwnx_wakeup_init,
    rwnx_wakeup_lock, rwnx_wakeup_lock_timeout, rwnx_wakeup_register, rwnx_wakeup_unlock,
    rwnx_wakeup_unregister, WakeLock,
};
