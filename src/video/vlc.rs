//! Variable-length code tables, represented the way the format itself
//! describes them: a flat array where each entry is either a branch (`next`
//! points at a pair of child entries, indexed by the next bit read) or a
//! leaf (`next == 0`, `value` holds the decoded symbol).
//!
//! Rather than hand-transcribing that flat array for every table (error
//! prone, and unreadable to review), each table is built once from its
//! canonical `(codeword, value)` pairs the same way the donor crate builds
//! its Huffman tables from canonical symbol counts rather than a baked
//! lookup array.
use crate::bitreader::BitReader;
use crate::errors::DecodeErrors;

#[derive(Copy, Clone, Debug)]
struct VlcNode
{
    next:  i32,
    value: i32,
}

/// A variable-length code table, decoded one bit at a time from index 0.
pub(crate) struct VlcTable
{
    nodes: Vec<VlcNode>,
    name:  &'static str,
}

impl VlcTable
{
    /// Build a table from canonical `(codeword, value)` pairs, `codeword`
    /// being a string of `'0'`/`'1'` characters, MSB (first transmitted bit)
    /// first.
    pub(crate) fn build(name: &'static str, codes: &[(&str, i32)]) -> VlcTable
    {
        let mut nodes = vec![VlcNode { next: -1, value: 0 }];

        for &(codeword, value) in codes
        {
            let mut index = 0usize;
            let bits: Vec<u8> = codeword.bytes().map(|b| b - b'0').collect();

            for (depth, &bit) in bits.iter().enumerate()
            {
                if nodes[index].next <= 0
                {
                    let base = nodes.len() as i32;
                    nodes.push(VlcNode { next: -1, value: 0 });
                    nodes.push(VlcNode { next: -1, value: 0 });
                    nodes[index].next = base;
                }

                let child = (nodes[index].next + i32::from(bit)) as usize;

                if depth + 1 == bits.len()
                {
                    nodes[child] = VlcNode { next: 0, value };
                }
                else
                {
                    index = child;
                }
            }
        }

        VlcTable { nodes, name }
    }

    /// Walk the tree one bit at a time until a leaf or an illegal code is
    /// reached.
    pub(crate) fn decode(&self, reader: &mut BitReader) -> Result<i32, DecodeErrors>
    {
        let mut index = 0usize;

        loop
        {
            let node = self.nodes[index];

            if node.next == 0
            {
                return Ok(node.value);
            }

            if node.next < 0
            {
                return Err(DecodeErrors::InvalidVlc(self.name));
            }

            let bit = reader.consume(1);

            if bit < 0
            {
                return Err(DecodeErrors::UnexpectedEndOfStream);
            }

            index = (node.next + bit as i32) as usize;
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::bitreader::BitReader;

    fn reader_over(bytes: &[u8]) -> BitReader
    {
        let bytes = bytes.to_vec();
        let mut delivered = false;

        BitReader::new(Box::new(move |buf: &mut Vec<u8>| {
            if delivered
            {
                return false;
            }

            buf.extend_from_slice(&bytes);
            delivered = true;
            true
        }))
    }

    #[test]
    fn decodes_a_small_prefix_free_table()
    {
        let table = VlcTable::build("test", &[("1", 1), ("01", 2), ("00", 3)]);

        let mut r = reader_over(&[0b1_01_00_00]);
        assert_eq!(table.decode(&mut r).unwrap(), 1);
        assert_eq!(table.decode(&mut r).unwrap(), 2);
        assert_eq!(table.decode(&mut r).unwrap(), 3);
    }

    #[test]
    fn shared_prefixes_reuse_branch_nodes()
    {
        let table = VlcTable::build("test", &[("10", 1), ("11", 2), ("0", 3)]);

        let mut r = reader_over(&[0b10_11_0_000]);
        assert_eq!(table.decode(&mut r).unwrap(), 1);
        assert_eq!(table.decode(&mut r).unwrap(), 2);
        assert_eq!(table.decode(&mut r).unwrap(), 3);
    }
}
