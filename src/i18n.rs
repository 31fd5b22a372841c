// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use bazi_engine::i18n::t;
/// let msg = t("energy.tier.upper");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use bazi_engine::i18n::t_with_args;
/// let msg = t_with_args("energy.description", &[("total", "82")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        // 显式设置为默认语言
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        // 测试切换语言
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");

        set_locale("en");
        assert_eq!(current_locale(), "en");

        // 恢复默认语言
        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("energy.tier.upper"), "上乘");

        set_locale("en");
        assert_eq!(t("energy.tier.upper"), "excellent");

        // 恢复默认语言
        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        let msg = t_with_args("energy.description", &[("total", "82"), ("element", "木")]);
        assert!(msg.contains("82"));
        assert!(msg.contains("木"));
        assert!(!msg.contains("%{total}"));

        set_locale("en");
        let msg = t_with_args("energy.description", &[("total", "82")]);
        assert!(msg.contains("82"));
        assert!(msg.contains("Life energy"));

        // 恢复默认语言
        set_locale("zh-CN");
    }

    #[test]
    fn test_description_follows_locale() {
        use crate::domain::energy::EnergyScores;
        use crate::domain::types::Element;
        use crate::engine::scoring::DescriptionParams;

        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        let scores = EnergyScores {
            career: 90,
            wealth: 70,
            emotion: 80,
            health: 85,
            wisdom: 75,
        };
        let params = DescriptionParams::new(80, Element::Fire, false, &scores, false);

        set_locale("zh-CN");
        let zh = params.render();
        assert!(zh.contains("80"));
        assert!(zh.contains("中上"));
        assert!(zh.contains("火"));

        set_locale("en");
        let en = params.render();
        assert!(en.contains("good"));

        set_locale("zh-CN");
    }
}
