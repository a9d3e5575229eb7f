//! PM wakeup 模块 — 对应 LicheeRV aic8800 依赖的 `linux/pm_wakeup.h`
//!
//! 提供与 Linux wakeup source 语义对齐的唤醒源注册与持有/释放原语，便于 FDRV
//! wakelock 路径与 LicheeRV 对照。
//!
//! - **[WakeupSource]**：命名唤醒源，`active` 持有标志由本模块持有并合并，
//!   `stay_awake`/`relax`/`wakeup_event` 对应 `__pm_stay_awake`/`__pm_relax`/`__pm_wakeup_event`
//! - **注册表**：全局唤醒源列表（对应内核 wakeup_sources 链表），
//!   `wakeup_source_register`/`wakeup_source_unregister` 成对使用
//! - **定时持有**：`wakeup_event(msec)` 到期自动释放，由平台定时器回调周期调用
//!   [`wakeup_timer_tick`] 驱动（同 bsp 侧 sdio_tick 的软中断 tick 模式）
//! - **挂起闸门**：[`pm_suspend_check`]，任一源持有期间返回 ResourceBusy

#![no_std]

extern crate alloc;

mod device;
mod wakeup;

pub use device::Device;
pub use wakeup::{
    pm_suspend_check, pm_wakeup_pending, registered_count, wakeup_source_register,
    wakeup_source_registered, wakeup_source_unregister, wakeup_timer_tick, WakeupSource,
};
