use super::{alloc, wide_as_bytes};

#[test]
fn test_alloc_bytes() {
    let data = b"hello, world!";
    let (ptr, len, dealloc) = alloc(data).unwrap();
    assert_eq!(len, 13);

    let copied = unsafe { core::slice::from_raw_parts(ptr.cast::<u8>(), 13) };
    assert_eq!(copied, data);

    let dealloc = dealloc.expect("non-empty values have a destructor");

    unsafe {
        dealloc(ptr);
    }
}

#[test]
fn test_alloc_bytes_empty() {
    let (_, len, dealloc) = alloc(b"").unwrap();
    assert_eq!(len, 0);
    assert!(dealloc.is_none());
}

#[test]
fn test_alloc_wide_is_aligned() {
    let wide = "héllo".encode_utf16().collect::<std::vec::Vec<u16>>();
    let bytes = wide_as_bytes(&wide);
    assert_eq!(bytes.len(), 10);

    let (ptr, len, dealloc) = alloc(bytes).unwrap();
    assert_eq!(len, 10);
    assert!(ptr.cast::<u16>().is_aligned());

    unsafe {
        dealloc.unwrap()(ptr);
    }
}
