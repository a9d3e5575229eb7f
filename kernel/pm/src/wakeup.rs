//! Wakeup source 模型 — 对应 `drivers/base/power/wakeup.c` / `linux/pm_wakeup.h`
//!
//! 语义与内核对齐：
//! - 持有/释放幂等，重复 `stay_awake` 不叠加计数（对应 `__pm_stay_awake` 的
//!   `if (!ws->active)` 路径），持有状态由本模块合并
//! - `wakeup_event(msec)` 为限时持有，到期自动释放；续期调用只延后、不提前到期点；
//!   `msec == 0` 按立即到期处理，原样记录不做替换或取整
//! - 注销持有中的源时先释放再移出注册表，保证睡眠抑制计数平衡
//! - 每源持有/释放可并发调用（Atomic + spin::Mutex），与其在中断上下文使用的
//!   前提一致；本模块不睡眠、不阻塞
//!
//! 无精确定时器环境下，到期由平台定时器回调周期调用 [`wakeup_timer_tick`] 推进
//! （对应内核 pm_wakeup_timer_fn 的到期路径；驱动方式同 bsp 的 sdio_tick）。

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use axerrno::{AxError, AxResult};
use spin::Mutex;

/// 全局唤醒源注册表（对应内核 wakeup_sources 链表）
static WAKEUP_SOURCES: Mutex<Vec<Arc<WakeupSource>>> = Mutex::new(Vec::new());

/// 环境时钟（毫秒），仅由 wakeup_timer_tick 推进（对应 jiffies 的角色）
static WAKEUP_NOW_MS: AtomicU64 = AtomicU64::new(0);

/// 定时持有状态，timer 锁内更新；锁序为 注册表 → timer，反向不取
struct TimerState {
    /// 绝对到期时刻（毫秒）；None 表示无定时释放
    deadline_ms: Option<u64>,
    /// 最近一次 wakeup_event 请求的时长（诊断用，原样记录）
    last_timeout_ms: Option<u32>,
}

/// 命名唤醒源（对应 `struct wakeup_source`）
///
/// 持有期间系统不得进入挂起；统计字段与内核 sysfs 暴露的同名计数对齐。
pub struct WakeupSource {
    name: String,
    /// 设备绑定注册时的归属设备名（仅诊断）
    dev_name: Option<String>,
    /// 持有标志（对应 ws->active）
    active: AtomicBool,
    /// 由释放态进入持有态的次数（对应 active_count）
    active_count: AtomicU32,
    /// wakeup_event 事件次数（对应 event_count）
    event_count: AtomicU32,
    /// 显式释放次数（对应 relax_count）
    relax_count: AtomicU32,
    /// 定时到期释放次数（对应 expire_count）
    expire_count: AtomicU32,
    timer: Mutex<TimerState>,
}

impl WakeupSource {
    fn new(name: &str, dev_name: Option<String>) -> Self {
        Self {
            name: String::from(name),
            dev_name,
            active: AtomicBool::new(false),
            active_count: AtomicU32::new(0),
            event_count: AtomicU32::new(0),
            relax_count: AtomicU32::new(0),
            expire_count: AtomicU32::new(0),
            timer: Mutex::new(TimerState {
                deadline_ms: None,
                last_timeout_ms: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 归属设备名；仅设备绑定注册的源为 Some
    pub fn device_name(&self) -> Option<&str> {
        self.dev_name.as_deref()
    }

    /// 是否处于持有状态（对应 ws->active）
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// 持有，抑制系统挂起（对应 `__pm_stay_awake`）
    ///
    /// 幂等：已持有时仅保持持有。取消未到期的定时释放（显式持有需配对 relax）。
    pub fn stay_awake(&self) {
        let mut timer = self.timer.lock();
        timer.deadline_ms = None;
        drop(timer);
        if !self.active.swap(true, Ordering::AcqRel) {
            self.active_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 释放持有，允许系统挂起（对应 `__pm_relax`）
    ///
    /// 幂等：未持有时为空操作。
    pub fn relax(&self) {
        let mut timer = self.timer.lock();
        timer.deadline_ms = None;
        drop(timer);
        if self.active.swap(false, Ordering::AcqRel) {
            self.relax_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 限时持有，至多 `msec` 毫秒后由环境自动释放（对应 `__pm_wakeup_event(ws, msec)`）
    ///
    /// - `msec == 0`：立即到期，事件计数后随即释放（对应 expires 即为当前时刻的路径）
    /// - 续期：已有更晚的到期点时保留更晚者，只延后、不提前
    pub fn wakeup_event(&self, msec: u32) {
        self.event_count.fetch_add(1, Ordering::Relaxed);
        let mut timer = self.timer.lock();
        timer.last_timeout_ms = Some(msec);
        if msec == 0 {
            timer.deadline_ms = None;
            drop(timer);
            self.active.swap(false, Ordering::AcqRel);
            self.expire_count.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let deadline = WAKEUP_NOW_MS.load(Ordering::Acquire) + msec as u64;
        timer.deadline_ms = Some(match timer.deadline_ms {
            Some(cur) if cur > deadline => cur,
            _ => deadline,
        });
        drop(timer);
        if !self.active.swap(true, Ordering::AcqRel) {
            self.active_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn active_count(&self) -> u32 {
        self.active_count.load(Ordering::Relaxed)
    }

    pub fn event_count(&self) -> u32 {
        self.event_count.load(Ordering::Relaxed)
    }

    pub fn relax_count(&self) -> u32 {
        self.relax_count.load(Ordering::Relaxed)
    }

    pub fn expire_count(&self) -> u32 {
        self.expire_count.load(Ordering::Relaxed)
    }

    /// 最近一次 wakeup_event 请求的时长（毫秒，原样记录）
    pub fn last_timeout_ms(&self) -> Option<u32> {
        self.timer.lock().last_timeout_ms
    }
}

fn register_inner(dev_name: Option<String>, name: &str) -> Option<Arc<WakeupSource>> {
    // 名字无效视为分配失败（对应内核返回 NULL），由调用方检查，不重试
    if name.is_empty() {
        log::debug!(target: "wakelock::pm", "wakeup_source_register: invalid name");
        return None;
    }
    let ws = Arc::new(WakeupSource::new(name, dev_name));
    WAKEUP_SOURCES.lock().push(ws.clone());
    Some(ws)
}

/// 注册唤醒源（对应 >= 5.4 内核的 `wakeup_source_register(dev, name)` 签名）
///
/// `dev` 为 None 时不绑定设备。失败返回 None（对应返回 NULL），由调用方检查。
#[cfg(feature = "device-bound")]
pub fn wakeup_source_register(dev: Option<&crate::Device>, name: &str) -> Option<Arc<WakeupSource>> {
    register_inner(dev.map(|d| String::from(d.name())), name)
}

/// 注册唤醒源（对应旧内核仅名字的 `wakeup_source_register(name)` 签名）
#[cfg(not(feature = "device-bound"))]
pub fn wakeup_source_register(name: &str) -> Option<Arc<WakeupSource>> {
    register_inner(None, name)
}

/// 注销唤醒源并移出注册表（对应 `wakeup_source_unregister`）
///
/// 仍处于持有状态时先释放，绝不在持有状态下销毁，保证睡眠抑制计数平衡。
pub fn wakeup_source_unregister(ws: Arc<WakeupSource>) {
    if ws.is_active() {
        ws.relax();
    }
    let mut sources = WAKEUP_SOURCES.lock();
    if let Some(pos) = sources.iter().position(|w| Arc::ptr_eq(w, &ws)) {
        sources.swap_remove(pos);
    }
}

/// 指定名字的唤醒源当前是否在注册表中
pub fn wakeup_source_registered(name: &str) -> bool {
    WAKEUP_SOURCES.lock().iter().any(|ws| ws.name() == name)
}

/// 当前注册表中的唤醒源数量
pub fn registered_count() -> usize {
    WAKEUP_SOURCES.lock().len()
}

/// 是否存在处于持有状态的唤醒源（对应 pm_wakeup_pending 的简化）
pub fn pm_wakeup_pending() -> bool {
    WAKEUP_SOURCES.lock().iter().any(|ws| ws.is_active())
}

/// 挂起闸门：任一唤醒源持有期间返回 `ResourceBusy`（对应挂起路径上的 -EBUSY）
pub fn pm_suspend_check() -> AxResult<()> {
    if pm_wakeup_pending() {
        return Err(AxError::ResourceBusy);
    }
    Ok(())
}

/// 推进环境时钟 `elapsed_ms` 毫秒并释放到期的限时持有
///
/// 由平台定时器回调周期调用（对应 pm_wakeup_timer_fn 的到期释放；驱动方式同
/// bsp 的 sdio_tick：`axtask::register_timer_callback` 链上周期触发）。
pub fn wakeup_timer_tick(elapsed_ms: u64) {
    let now = WAKEUP_NOW_MS.fetch_add(elapsed_ms, Ordering::AcqRel) + elapsed_ms;
    let sources = WAKEUP_SOURCES.lock();
    for ws in sources.iter() {
        let mut timer = ws.timer.lock();
        match timer.deadline_ms {
            Some(deadline) if deadline <= now => {
                timer.deadline_ms = None;
                drop(timer);
                if ws.active.swap(false, Ordering::AcqRel) {
                    ws.expire_count.fetch_add(1, Ordering::Relaxed);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 串行化会改动全局注册表/时钟可见状态的用例
    static TEST_GATE: Mutex<()> = Mutex::new(());

    /// 按当前能力开关选用注册签名
    fn register(name: &str) -> Option<Arc<WakeupSource>> {
        #[cfg(feature = "device-bound")]
        return wakeup_source_register(None, name);
        #[cfg(not(feature = "device-bound"))]
        return wakeup_source_register(name);
    }

    #[test]
    fn register_and_query() {
        let _g = TEST_GATE.lock();
        let ws = register("pm_test_reg").unwrap();
        assert!(wakeup_source_registered("pm_test_reg"));
        assert!(!ws.is_active());
        assert_eq!(ws.device_name(), None);
        wakeup_source_unregister(ws);
        assert!(!wakeup_source_registered("pm_test_reg"));
    }

    #[test]
    fn register_invalid_name() {
        assert!(register("").is_none());
    }

    #[cfg(feature = "device-bound")]
    #[test]
    fn register_device_bound() {
        let _g = TEST_GATE.lock();
        let dev = crate::Device::new("aicwf_sdio");
        let ws = wakeup_source_register(Some(&dev), "pm_test_dev").unwrap();
        assert_eq!(ws.device_name(), Some("aicwf_sdio"));
        wakeup_source_unregister(ws);
    }

    #[test]
    fn stay_awake_relax_idempotent() {
        let _g = TEST_GATE.lock();
        let ws = register("pm_test_idem").unwrap();
        ws.stay_awake();
        ws.stay_awake();
        ws.stay_awake();
        assert!(ws.is_active());
        assert_eq!(ws.active_count(), 1);
        ws.relax();
        assert!(!ws.is_active());
        assert_eq!(ws.relax_count(), 1);
        ws.relax();
        assert_eq!(ws.relax_count(), 1);
        wakeup_source_unregister(ws);
    }

    #[test]
    fn unregister_active_releases_first() {
        let _g = TEST_GATE.lock();
        let ws = register("pm_test_unreg_active").unwrap();
        ws.stay_awake();
        assert!(ws.is_active());
        let probe = ws.clone();
        wakeup_source_unregister(ws);
        assert!(!probe.is_active());
        assert!(!wakeup_source_registered("pm_test_unreg_active"));
    }

    #[test]
    fn wakeup_event_expires_on_tick() {
        let _g = TEST_GATE.lock();
        let ws = register("pm_test_timeout").unwrap();
        ws.wakeup_event(5);
        assert!(ws.is_active());
        assert_eq!(ws.last_timeout_ms(), Some(5));
        wakeup_timer_tick(3);
        assert!(ws.is_active());
        // 续期只延后到期点：从当前时刻再算 5ms
        ws.wakeup_event(5);
        wakeup_timer_tick(4);
        assert!(ws.is_active());
        wakeup_timer_tick(2);
        assert!(!ws.is_active());
        assert_eq!(ws.expire_count(), 1);
        // 显式持有取消定时释放
        ws.wakeup_event(3);
        ws.stay_awake();
        wakeup_timer_tick(10);
        assert!(ws.is_active());
        ws.relax();
        wakeup_source_unregister(ws);
    }

    #[test]
    fn wakeup_event_zero_is_immediate_expiry() {
        let _g = TEST_GATE.lock();
        let ws = register("pm_test_zero").unwrap();
        ws.wakeup_event(0);
        assert!(!ws.is_active());
        assert_eq!(ws.last_timeout_ms(), Some(0));
        assert_eq!(ws.expire_count(), 1);
        wakeup_source_unregister(ws);
    }

    #[test]
    fn suspend_gate_tracks_active_sources() {
        let _g = TEST_GATE.lock();
        let ws = register("pm_test_gate").unwrap();
        assert!(pm_suspend_check().is_ok());
        ws.stay_awake();
        assert!(pm_wakeup_pending());
        assert!(matches!(pm_suspend_check(), Err(AxError::ResourceBusy)));
        ws.relax();
        assert!(pm_suspend_check().is_ok());
        wakeup_source_unregister(ws);
    }
}
