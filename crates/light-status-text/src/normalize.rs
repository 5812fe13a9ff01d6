/// 将一行状态输出整理成可单行绘制的形式，原地修改，返回可用长度
///
/// 内容在第一个 NUL 处截断。行内换行替换为空格，行尾换行直接截掉。
/// 多字节序列按首字节整体跳过，不检查其内部字节，也不校验编码是否合法。
pub fn normalize(buf: &mut [u8]) -> usize {
    let len = memchr::memchr(0, buf).unwrap_or(buf.len());
    let mut i = 0;

    while i < len {
        let byte = buf[i];
        if byte.is_ascii() {
            if byte == b'\n' {
                if i == len - 1 {
                    return len - 1;
                }
                buf[i] = b' ';
            }
            i += 1;
        } else {
            i += sequence_len(byte);
        }
    }

    len
}

fn sequence_len(lead: u8) -> usize {
    match lead & 0xF0 {
        0xE0 => 3,
        0xF0 => 4,
        _ => 2,
    }
}
