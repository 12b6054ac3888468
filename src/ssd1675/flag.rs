/// Parameter bytes for the SSD1675 commands used by this driver.
pub struct Flag;
#[allow(dead_code)]
impl Flag {
    // Data Entry Mode (0x11) flags
    pub const DATA_ENTRY_INCRY_INCRX: u8 = 0x03; // Y increment, X increment

    // Deep Sleep Mode (0x10) flags
    pub const DEEP_SLEEP_NORMAL_MODE: u8 = 0x00;
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01; // Enter deep sleep, RAM retained

    // Temperature Sensor Control (0x18) flags
    pub const INTERNAL_TEMP_SENSOR: u8 = 0x80;

    // Display Update Control 2 (0x22) sequence selectors
    pub const DISPLAY_UPDATE_FULL: u8 = 0xC7; // Clock, analog, display with full LUT
    pub const DISPLAY_UPDATE_PARTIAL: u8 = 0x0C; // Display only, keeps clock/analog powered
    pub const DISPLAY_UPDATE_ENABLE_CLOCK_ANALOG: u8 = 0xC0; // Power clock & analog, no display

    // Border Waveform Control (0x3C) flags
    pub const BORDER_WAVEFORM_LUT1: u8 = 0x01; // Partial refresh border
    pub const BORDER_WAVEFORM_LUT3: u8 = 0x03; // Full refresh border

    // VCOM Control (0x2C) values, panel-specific
    pub const VCOM_FULL_REFRESH: u8 = 0x55;
    pub const VCOM_PARTIAL_REFRESH: u8 = 0x26;

    // Gate Driving Voltage Control (0x03)
    pub const GATE_VOLTAGE_DEFAULT: u8 = 0x15;

    // Source Driving Voltage Control (0x04), VSH1/VSH2/VSL
    pub const SOURCE_VOLTAGE_DEFAULT: [u8; 3] = [0x41, 0xA8, 0x32];

    // Dummy Line Period (0x3A) and Gate Line Width (0x3B)
    pub const DUMMY_LINE_DEFAULT: u8 = 0x30;
    pub const GATE_LINE_WIDTH_DEFAULT: u8 = 0x0A;

    // Display Option register (0x37) payload enabling the ping-pong
    // RAM arrangement the partial waveform expects
    pub const DISPLAY_OPTION_PARTIAL: [u8; 7] = [0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00];

    // Common RAM data bit definitions (for WRITE_BW_DATA)
    pub const RAM_BIT_BLACK: u8 = 0x00;
    pub const RAM_BIT_WHITE: u8 = 0x01;
}
