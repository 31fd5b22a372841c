// ==========================================
// 八字排盘引擎 - 用户输入
// ==========================================
// 展示层提交的排盘请求，字段保持原始字符串形式，
// 解析与校验在 calendar::adapter 中完成
// JSON 字段名为 camelCase（birthDate / birthTime / isLunar ...）
// ==========================================

use crate::domain::types::Gender;
use serde::{Deserialize, Serialize};

// ==========================================
// BirthLocation - 出生地
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthLocation {
    pub longitude: f64,       // 经度（东经为正）
    pub latitude: f64,        // 纬度
    pub province: String,     // 省份
    pub city: String,         // 城市
    #[serde(default)]
    pub area: Option<String>, // 区县（可选）
}

// ==========================================
// UserInput - 排盘输入
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub name: String,
    pub gender: Gender,

    /// 出生日期 "YYYY-MM-DD"（公历或农历，视 is_lunar 而定）
    pub birth_date: String,

    /// 出生时间 "HH:mm"
    pub birth_time: String,

    /// birth_date 是否为农历（非闰月）
    #[serde(default)]
    pub is_lunar: bool,

    /// 是否按出生地经度做真太阳时校正
    #[serde(default)]
    pub use_solar_time: bool,

    #[serde(default)]
    pub birth_location: Option<BirthLocation>,
}

impl UserInput {
    /// 参与真太阳时校正的经度（未开启校正或缺少出生地时为 None）
    pub fn correction_longitude(&self) -> Option<f64> {
        if !self.use_solar_time {
            return None;
        }
        self.birth_location.as_ref().map(|loc| loc.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> UserInput {
        sample_input_named("测试")
    }

    fn sample_input_named(name: &str) -> UserInput {
        UserInput {
            name: name.to_string(),
            gender: Gender::Male,
            birth_date: "2024-02-10".to_string(),
            birth_time: "12:00".to_string(),
            is_lunar: false,
            use_solar_time: true,
            birth_location: Some(BirthLocation {
                longitude: 135.0,
                latitude: 35.0,
                province: "测试省".to_string(),
                city: "测试市".to_string(),
                area: None,
            }),
        }
    }

    #[test]
    fn test_correction_longitude_requires_flag() {
        let mut input = sample_input();
        assert_eq!(input.correction_longitude(), Some(135.0));

        input.use_solar_time = false;
        assert_eq!(input.correction_longitude(), None);
    }

    #[test]
    fn test_parses_camel_case_request() {
        let json = r#"{
            "name": "a",
            "gender": "male",
            "birthDate": "2024-02-10",
            "birthTime": "12:00",
            "isLunar": false,
            "useSolarTime": true,
            "birthLocation": {
                "longitude": 135.0,
                "latitude": 35.0,
                "province": "测试省",
                "city": "测试市"
            }
        }"#;
        let input: UserInput = serde_json::from_str(json).unwrap();
        assert_eq!(input, sample_input_named("a"));
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let value = serde_json::to_value(sample_input()).unwrap();
        assert_eq!(value["birthDate"], "2024-02-10");
        assert_eq!(value["useSolarTime"], true);
        assert!(value.get("birth_date").is_none());
    }

    #[test]
    fn test_snake_case_keys_are_rejected() {
        let json = r#"{"name":"a","gender":"male","birth_date":"2024-02-10","birth_time":"12:00"}"#;
        assert!(serde_json::from_str::<UserInput>(json).is_err());
    }

    #[test]
    fn test_optional_fields_default_when_absent() {
        let json = r#"{
            "name": "甲",
            "gender": "female",
            "birthDate": "1990-05-01",
            "birthTime": "08:30"
        }"#;
        let input: UserInput = serde_json::from_str(json).unwrap();
        assert!(!input.is_lunar);
        assert!(!input.use_solar_time);
        assert!(input.birth_location.is_none());
        assert_eq!(input.gender, Gender::Female);
    }
}
