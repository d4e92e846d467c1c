//! Bearer 토큰 추출
//!
//! 요청의 `Authorization` 헤더에서 토큰을 꺼냅니다.

const BEARER_SCHEME: &str = "bearer";

/// 토큰 추출기
pub struct TokenExtractor;

impl TokenExtractor {
    /// `Authorization: Bearer <token>`에서 토큰 추출
    ///
    /// 헤더가 없거나 Bearer 형식이 아니면 빈 문자열을 반환합니다.
    /// 빈 문자열은 "토큰 미제공"이며 "잘못된 토큰"과 구분됩니다.
    pub fn get_token(authorization: Option<&str>) -> String {
        let Some(value) = authorization else {
            return String::new();
        };

        let value = value.trim();
        let Some((scheme, credential)) = value.split_once(' ') else {
            return String::new();
        };

        if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
            return String::new();
        }

        credential.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_token() {
        // Bearer
        assert_eq!(TokenExtractor::get_token(Some("Bearer mytoken")), "mytoken");

        // 소문자 scheme, 여분 공백
        assert_eq!(TokenExtractor::get_token(Some("  bearer   mytoken ")), "mytoken");

        // 다른 scheme
        assert_eq!(TokenExtractor::get_token(Some("Basic dXNlcjpwYXNz")), "");

        // 토큰 없음
        assert_eq!(TokenExtractor::get_token(Some("Bearer")), "");
        assert_eq!(TokenExtractor::get_token(Some("Bearer   ")), "");

        // 헤더 없음
        assert_eq!(TokenExtractor::get_token(None), "");
    }
}
