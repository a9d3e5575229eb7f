//! Device — 对应 `struct device` 中唤醒源注册用到的最小子集
//!
//! 仅作为设备绑定注册（`wakeup_source_register(dev, name)`，>= 5.4 签名）的归属方，
//! 不承载总线/驱动模型。

use alloc::string::String;

/// 唤醒源的归属设备（对应 `struct device`，仅名字）
pub struct Device {
    name: String,
}

impl Device {
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
        }
    }

    /// 设备名（对应 dev_name(dev)）
    pub fn name(&self) -> &str {
        &self.name
    }
}
