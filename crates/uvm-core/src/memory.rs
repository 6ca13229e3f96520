use crate::fault::Fault;

/// Owns every live segment of the machine.
///
/// Segment 0 always exists and holds the program currently being executed. Every other live
/// segment is reachable only through an identifier handed out by [`Memory::allocate`]; segments
/// are stored in a dense `Vec` indexed by identifier, with abandoned identifiers pushed onto a
/// free list so they can be reissued, bounding the identifier space to the allocator's
/// high-water mark.
pub struct Memory {
    segments: Vec<Option<Box<[u32]>>>,
    free: Vec<u32>,
}

impl Memory {
    /// Create a store with `program` installed as segment 0.
    pub fn new(program: Vec<u32>) -> Self {
        Self {
            segments: vec![Some(program.into_boxed_slice())],
            free: Vec::new(),
        }
    }

    /// Install `words` as segment 0, releasing whatever was there before.
    pub fn install_program(&mut self, words: Vec<u32>) {
        self.segments[0] = Some(words.into_boxed_slice());
    }

    /// Allocate a fresh, zero-initialized segment of `size` words and return its identifier.
    ///
    /// Reuses an abandoned identifier when one is available, otherwise grows the segment table.
    pub fn allocate(&mut self, size: u32) -> Result<u32, Fault> {
        let mut words = Vec::new();
        words
            .try_reserve_exact(size as usize)
            .map_err(|_| Fault::OutOfHostMemory { requested: size })?;
        words.resize(size as usize, 0);
        let boxed = words.into_boxed_slice();

        Ok(match self.free.pop() {
            Some(id) => {
                self.segments[id as usize] = Some(boxed);
                id
            }
            None => {
                let id = self.segments.len() as u32;
                self.segments.push(Some(boxed));
                id
            }
        })
    }

    /// Free the segment named by `id`, allowing its identifier to be reissued.
    pub fn abandon(&mut self, id: u32) -> Result<(), Fault> {
        if id == 0 {
            return Err(Fault::AbandonSegmentZero);
        }
        match self.segments.get_mut(id as usize) {
            Some(slot @ Some(_)) => {
                *slot = None;
                self.free.push(id);
                Ok(())
            }
            _ => Err(Fault::InvalidSegment { id }),
        }
    }

    /// Read the word at `offset` in segment `id`.
    pub fn load(&self, id: u32, offset: u32) -> Result<u32, Fault> {
        let seg = self.segment(id)?;
        seg.get(offset as usize).copied().ok_or(Fault::SegmentOffsetOutOfBounds {
            id,
            offset,
            len: seg.len() as u32,
        })
    }

    /// Write `word` to `offset` in segment `id`.
    pub fn store(&mut self, id: u32, offset: u32, word: u32) -> Result<(), Fault> {
        let len = self.segment(id)?.len() as u32;
        if offset >= len {
            return Err(Fault::SegmentOffsetOutOfBounds { id, offset, len });
        }
        // `segment` above already proved the slot is occupied.
        self.segments[id as usize].as_mut().unwrap()[offset as usize] = word;
        Ok(())
    }

    /// Return an owned copy of segment `id`'s words, for installing as a new segment 0.
    pub fn duplicate(&self, id: u32) -> Result<Vec<u32>, Fault> {
        Ok(self.segment(id)?.to_vec())
    }

    /// The length, in words, of segment `id`.
    pub fn length(&self, id: u32) -> Result<u32, Fault> {
        Ok(self.segment(id)?.len() as u32)
    }

    fn segment(&self, id: u32) -> Result<&[u32], Fault> {
        self.segments
            .get(id as usize)
            .and_then(|slot| slot.as_deref())
            .ok_or(Fault::InvalidSegment { id })
    }
}
