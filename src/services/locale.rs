use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Vi,
    En,
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vi" | "vi-vn" => Ok(Locale::Vi),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(ConfigError::InvalidLocale(other.to_string())),
        }
    }
}

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::Vi => &VI,
            Locale::En => &EN,
        }
    }
}

/// Every user-facing sentence the console can emit.
#[derive(Debug)]
pub struct Strings {
    pub ai_unavailable: &'static str,
    pub server_unreachable: &'static str,
    pub query_failed: &'static str,
    pub send_failed: &'static str,
    pub predicting: &'static str,
    pub prediction_failed: &'static str,
    pub prediction_unreachable: &'static str,
    pub pollution_level: &'static str,
    pub index: &'static str,
    pub prediction_result: &'static str,
    pub sample_intro: &'static str,
    pub samples: [&'static str; 4],
    pub stats_request: &'static str,
    pub stats_failed: &'static str,
    pub stats_unreachable: &'static str,
}

static VI: Strings = Strings {
    ai_unavailable: "⚠️ Hệ thống AI hiện không khả dụng. Vui lòng kiểm tra cấu hình API key.",
    server_unreachable: "❌ Không thể kết nối đến server. Vui lòng thử lại sau.",
    query_failed: "❌ Có lỗi xảy ra khi xử lý câu hỏi của bạn.",
    send_failed: "❌ Không thể gửi tin nhắn. Vui lòng thử lại.",
    predicting: "⏳ Đang dự đoán...",
    prediction_failed: "❌ Không thể thực hiện dự đoán. Vui lòng thử lại.",
    prediction_unreachable: "❌ Lỗi kết nối. Vui lòng thử lại sau.",
    pollution_level: "Mức độ ô nhiễm",
    index: "Chỉ số",
    prediction_result: "Kết quả dự đoán",
    sample_intro: "💡 Bạn có thể thử các câu hỏi mẫu:",
    samples: [
        "Dữ liệu ô nhiễm ngày 1 tháng 5 năm 2004",
        "Dự đoán mức độ ô nhiễm với PT08_S1_CO=120, C6H6_GT=5.3, PT08_S5_O3=45.2, PT08_S2_NMHC=220.7, PT08_S4_NO2=34.1",
        "Thống kê trung bình ô nhiễm từ ngày 1 đến 30 tháng 5 năm 2004",
        "Thêm dữ liệu ô nhiễm ngày 10/4/2007 lúc 8h với các thông số...",
    ],
    stats_request: "Thống kê",
    stats_failed: "❌ Không thể tính thống kê cho khoảng thời gian này.",
    stats_unreachable: "❌ Lỗi kết nối. Vui lòng thử lại sau.",
};

static EN: Strings = Strings {
    ai_unavailable: "⚠️ The AI system is currently unavailable. Please check the API key configuration.",
    server_unreachable: "❌ Cannot connect to the server. Please try again later.",
    query_failed: "❌ Something went wrong while processing your question.",
    send_failed: "❌ Could not send the message. Please try again.",
    predicting: "⏳ Predicting...",
    prediction_failed: "❌ Could not make a prediction. Please try again.",
    prediction_unreachable: "❌ Connection error. Please try again later.",
    pollution_level: "Pollution level",
    index: "Index",
    prediction_result: "Prediction result",
    sample_intro: "💡 Try one of these sample questions:",
    samples: [
        "Pollution data for 1 May 2004",
        "Predict the pollution level with PT08_S1_CO=120, C6H6_GT=5.3, PT08_S5_O3=45.2, PT08_S2_NMHC=220.7, PT08_S4_NO2=34.1",
        "Average pollution statistics from 1 to 30 May 2004",
        "Add pollution data for 10/4/2007 at 8am with the readings...",
    ],
    stats_request: "Statistics",
    stats_failed: "❌ Could not compute statistics for that range.",
    stats_unreachable: "❌ Connection error. Please try again later.",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_locales() {
        assert_eq!("vi".parse::<Locale>(), Ok(Locale::Vi));
        assert_eq!(" EN ".parse::<Locale>(), Ok(Locale::En));
        assert_eq!(
            "fr".parse::<Locale>(),
            Err(ConfigError::InvalidLocale("fr".into()))
        );
    }

    #[test]
    fn vietnamese_is_default() {
        assert_eq!(Locale::default(), Locale::Vi);
        assert!(Locale::default().strings().send_failed.contains("Không thể gửi"));
    }
}
