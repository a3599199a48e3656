//! 二进制 PGM（P5）地图编解码
//!
//! 地图栅格的唯一持久化格式：魔数 `P5`，ASCII 头部依次为
//! 宽、高、最大灰度，随后紧跟 `width * height` 字节的行主序像素。
//! 头部允许任意空白分隔，允许 `#` 开头的注释行；
//! 像素段之后不允许有多余字节。

use crate::TypeError;
use crate::slam::MapImageData;

/// 将地图图像编码为二进制 PGM 字节流
///
/// 编码前先做 [`MapImageData::validate`] 校验，非法数据直接报错
/// 而不是落盘半成品文件。
pub fn encode(map: &MapImageData) -> Result<Vec<u8>, TypeError> {
    map.validate()?;
    let header = format!(
        "P5\n{} {}\n{}\n",
        map.width, map.height, map.max_gray_value
    );
    let mut out = Vec::with_capacity(header.len() + map.image.len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(&map.image);
    Ok(out)
}

/// 从二进制 PGM 字节流解码地图图像
pub fn decode(bytes: &[u8]) -> Result<MapImageData, TypeError> {
    let mut cursor = Cursor { bytes, pos: 0 };

    let magic = cursor.next_token()?;
    if magic != b"P5" {
        return Err(TypeError::Malformed(format!(
            "invalid PGM magic {:?}, expected \"P5\"",
            String::from_utf8_lossy(magic)
        )));
    }

    let width = cursor.next_int("width")?;
    let height = cursor.next_int("height")?;
    let max_gray_value = cursor.next_int("max_gray_value")?;
    if !(1..=255).contains(&max_gray_value) {
        return Err(TypeError::InvalidValue {
            field: "MapImageData.max_gray_value",
            value: max_gray_value as i64,
        });
    }

    // 头部结束于最大灰度后的单个空白字节，随后即像素数据
    cursor.skip_single_whitespace()?;

    let expected = width as usize * height as usize;
    let remaining = &cursor.bytes[cursor.pos..];
    if remaining.len() < expected {
        return Err(TypeError::SizeMismatch {
            field: "MapImageData.image",
            expected,
            actual: remaining.len(),
        });
    }
    if remaining.len() > expected {
        return Err(TypeError::Malformed(format!(
            "trailing {} bytes after pixel data",
            remaining.len() - expected
        )));
    }

    Ok(MapImageData::new(
        width,
        height,
        max_gray_value,
        remaining.to_vec(),
    ))
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// 跳过空白与 `#` 注释，返回下一个 token
    fn next_token(&mut self) -> Result<&'a [u8], TypeError> {
        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos < self.bytes.len() && self.bytes[self.pos] == b'#' {
                while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            break;
        }
        if self.pos >= self.bytes.len() {
            return Err(TypeError::Malformed(
                "unexpected end of PGM header".to_string(),
            ));
        }
        let start = self.pos;
        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        Ok(&self.bytes[start..self.pos])
    }

    fn next_int(&mut self, field: &'static str) -> Result<i32, TypeError> {
        let token = self.next_token()?;
        let text = std::str::from_utf8(token)
            .map_err(|_| TypeError::Malformed(format!("non-ASCII {field} in PGM header")))?;
        let value: i64 = text
            .parse()
            .map_err(|_| TypeError::Malformed(format!("invalid {field} {text:?} in PGM header")))?;
        if !(0..=i32::MAX as i64).contains(&value) {
            return Err(TypeError::InvalidValue { field, value });
        }
        Ok(value as i32)
    }

    fn skip_single_whitespace(&mut self) -> Result<(), TypeError> {
        match self.bytes.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(TypeError::Malformed(
                "missing whitespace after PGM header".to_string(),
            )),
        }
    }
}
