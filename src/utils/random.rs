//! 불투명 코드 생성
//!
//! 인가 코드, 자동 로그인 코드, SSID 모두 같은 방식으로 만듭니다.

use rand::RngCore;

/// 코드 하나에 들어가는 난수 바이트 수
pub const CODE_BYTES: usize = 16;

/// 16바이트 난수를 소문자 hex 문자열(32자)로 반환합니다.
pub fn generate_code() -> String {
    let mut bytes = [0u8; CODE_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
