use crate::error::{NetworkError, Result};

/// One supervised pattern: an input vector and the output it should produce.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSetRow {
    pub input: Vec<f64>,
    pub desired_output: Vec<f64>,
}

impl DataSetRow {
    pub fn new(input: Vec<f64>, desired_output: Vec<f64>) -> DataSetRow {
        DataSetRow { input, desired_output }
    }
}

/// Fixed-dimension training set. Rows keep their insertion order; training
/// visits them in exactly that order.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    input_size: usize,
    output_size: usize,
    rows: Vec<DataSetRow>,
}

impl DataSet {
    pub fn new(input_size: usize, output_size: usize) -> DataSet {
        DataSet { input_size, output_size, rows: Vec::new() }
    }

    /// Builds a set from parallel input/target slices, checking every row.
    pub fn from_rows(inputs: &[Vec<f64>], outputs: &[Vec<f64>]) -> Result<DataSet> {
        if inputs.len() != outputs.len() {
            return Err(NetworkError::dimension("data set targets", inputs.len(), outputs.len()));
        }
        let first_in = inputs.first().map_or(0, Vec::len);
        let first_out = outputs.first().map_or(0, Vec::len);
        let mut set = DataSet::new(first_in, first_out);
        for (input, output) in inputs.iter().zip(outputs) {
            set.add_row(DataSetRow::new(input.clone(), output.clone()))?;
        }
        Ok(set)
    }

    pub fn add_row(&mut self, row: DataSetRow) -> Result<()> {
        if row.input.len() != self.input_size {
            return Err(NetworkError::dimension("row input", self.input_size, row.input.len()));
        }
        if row.desired_output.len() != self.output_size {
            return Err(NetworkError::dimension(
                "row desired output",
                self.output_size,
                row.desired_output.len(),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn rows(&self) -> &[DataSetRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&DataSetRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
