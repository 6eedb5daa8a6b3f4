//! Canned Korean replies.

pub const GREETING_TRIGGER: &str = "안녕";
pub const FAREWELL_TRIGGER: &str = "잘가";

pub const MENU_PROMPT: &str =
    "안녕~ 나는 ^^서울시장 맛집봇 이야^^ 이제부터 나의 단골맛집을 소개할게!지역을 선택해줘~.~";
pub const FAREWELL_REPLY: &str = "너도 잘가~";
pub const GREETING_HINT: &str = "\"안녕\"이라고 말해줄래?";

pub const UNRECOGNIZED_CALLBACK: &str = "무슨 말인지 잘 모르겠어 ㅠㅠ 지역을 다시 선택해줄래?";
pub const DATA_SOURCE_UNAVAILABLE: &str =
    "지금은 단골 가게 정보를 불러올 수 없어 ㅠㅠ 잠시 후에 다시 시도해줘!";

pub fn ranking_header(district: &str) -> String {
    format!("나의 {district} 단골 가게 리스트야 ~.~")
}

pub fn ranking_entry(store: &str, visits: usize, link: &str) -> String {
    format!("* 나는 단골가게 \"{store}\"에 총 \"{visits}\"회 방문했어 *\n자세한 정보는 여기에!: {link}")
}

pub fn no_favorites(district: &str) -> String {
    format!("{district}에는 아직 단골 가게가 없어 ~.~")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_prompt_text() {
        assert!(MENU_PROMPT.contains("소개할게!지역을"));
        assert!(MENU_PROMPT.starts_with("안녕~ "));
        assert!(MENU_PROMPT.ends_with("~.~"));
    }
}
